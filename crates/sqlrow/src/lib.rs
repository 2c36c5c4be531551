//! # sqlrow
//!
//! A fluent SQL query builder with a small ActiveRecord-style model layer.
//!
//! ## Features
//!
//! - **Fluent builder**: chain `select`/`join`/`and_where`/`group`/`and_having`/
//!   `order`/`limit` on a [`Db`] and finish with `get`, `create`, `update` or
//!   `destroy`
//! - **Fixed clause order**: `FROM`, `JOIN`, `WHERE`, `GROUP BY`, `HAVING`,
//!   `ORDER BY`, `LIMIT`
//! - **Escaping**: scalars are quoted and escaped through the connection;
//!   known SQL function calls (`NOW()`, ...) and [`raw`] fragments pass through
//! - **Models**: belongs-to / has-many (optionally through a join table),
//!   lifecycle hooks, computed accessors, eager loading
//! - **Diagnostics**: every executed statement is kept in order
//!   ([`Db::runtime_info`])
//!
//! ## Example
//!
//! ```ignore
//! use sqlrow::prelude::*;
//! use sqlrow::mock::MockConnection;
//!
//! let mut db = Db::new(MockConnection::new());
//!
//! db.select("*")
//!     .join("b", "a.id=b.a_id")
//!     .and_where(("status", "active"))
//!     .group("a.id")
//!     .and_having(("COUNT(*)", 1))
//!     .order("a.id", "DESC")
//!     .limit(10, 5)
//!     .get("a")?;
//!
//! // SELECT * FROM a JOIN b ON a.id=b.a_id WHERE status = "active"
//! //   GROUP BY a.id HAVING COUNT(*) = 1 ORDER BY a.id DESC LIMIT 5, 10
//! ```
//!
//! The context is single-threaded: clause state is mutated in place. Share it
//! across threads through [`SharedDb`].

pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod escape;
pub mod mock;
pub mod model;
pub mod monitor;
pub mod prelude;
pub mod value;

pub use config::{ConnectionConfig, DbConfig};
pub use connection::{Connection, Connector, Cursor, Outcome, VecCursor, fetch_all};
pub use db::{ColumnDef, ColumnSpec, Db, Filter, QueryState, SharedDb};
pub use error::{OrmError, OrmResult};
pub use escape::{Escaper, escape_string};
pub use model::{
    Association, AssociationKind, AssociationOptions, Field, FindOptions, Hook, Inflector, Model,
    Record, Registry, SimpleInflector,
};
pub use monitor::{QueryType, RuntimeInfo, StatementLog};
pub use value::{Data, Value, raw};
