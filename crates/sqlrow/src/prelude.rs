//! Convenient imports for typical `sqlrow` usage.
//!
//! ```ignore
//! use sqlrow::prelude::*;
//! ```

pub use crate::{
    Data, Db, Field, Filter, FindOptions, Hook, Model, OrmError, OrmResult, Record, Value, raw,
};
pub use crate::{Connection, Cursor, Outcome};
