//! Fluent query builder and statement executor.
//!
//! A [`Db`] owns one connection and the clause state for exactly one pending
//! statement. Clause setters return `&mut Self` so calls chain; terminal
//! reads, updates and deletes render the statement, reset the state and run
//! it.
//!
//! ```ignore
//! use sqlrow::{Data, Db};
//!
//! let mut cursor = db
//!     .select("a.*")
//!     .join("b", "a.id=b.a_id")
//!     .and_where(Data::new().set("status", "active"))
//!     .order("a.id", "DESC")
//!     .limit(10, 0)
//!     .get("a")?;
//! ```
//!
//! Rendered clause order is fixed:
//! `SELECT .. FROM .. JOIN .. WHERE .. GROUP BY .. HAVING .. ORDER BY .. LIMIT ..`.
//!
//! `create` is the exception to the reset rule: it neither reads nor clears
//! pending WHERE/JOIN state, so `and_where(..).create(..)` does not filter
//! anything and leaves the predicates queued for the next read.

mod builder;
mod schema;
mod shared;


pub use builder::{Filter, Join, Predicate, QueryState};
pub use schema::{ColumnDef, ColumnSpec};
pub use shared::SharedDb;

use crate::config::{ConnectionConfig, DbConfig};
use crate::connection::{Connection, Connector, Cursor, Outcome};
use crate::error::OrmResult;
use crate::escape::Escaper;
use crate::model::{Model, Registry};
use crate::monitor::{RuntimeInfo, StatementLog};
use crate::value::{Data, Value};
use std::sync::Arc;

/// Query builder + executor bound to one connection.
pub struct Db {
    conn: Box<dyn Connection>,
    state: QueryState,
    log: StatementLog,
    escaper: Escaper,
    allow_manipulation: bool,
    registry: Registry,
}

impl Db {
    /// Wrap a connection with default configuration.
    pub fn new(conn: impl Connection + 'static) -> Self {
        Self::from_boxed(Box::new(conn))
    }

    /// Wrap an already boxed connection.
    pub fn from_boxed(conn: Box<dyn Connection>) -> Self {
        let config = DbConfig::default();
        Self {
            conn,
            state: QueryState::default(),
            log: StatementLog::new(),
            escaper: Escaper::new(config.raw_markers),
            allow_manipulation: config.allow_manipulation,
            registry: Registry::new(),
        }
    }

    /// Open a connection through `connector`.
    pub fn connect(connector: &dyn Connector, config: &ConnectionConfig) -> OrmResult<Self> {
        let conn = connector.connect(config).inspect_err(|_err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                host = %config.host,
                database = %config.database,
                error = %_err,
                "failed to connect"
            );
        })?;
        Ok(Self::from_boxed(conn))
    }

    /// Apply a configuration.
    pub fn with_config(mut self, config: DbConfig) -> Self {
        self.escaper = Escaper::new(config.raw_markers);
        self.allow_manipulation = config.allow_manipulation;
        self
    }

    /// Replace the model registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn connection(&self) -> &dyn Connection {
        self.conn.as_ref()
    }

    /// The pending clause state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn escaper(&self) -> &Escaper {
        &self.escaper
    }

    // ==================== Models ====================

    /// Register a model descriptor so associations can find it by name.
    pub fn register(&mut self, model: Model) -> Arc<Model> {
        self.registry.register(model)
    }

    /// Look up a registered model by entity name (case-insensitive).
    pub fn model(&self, name: &str) -> Option<Arc<Model>> {
        self.registry.get(name)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    // ==================== Clauses ====================

    /// Render a value as a SQL literal using the escaping rule.
    pub fn literal(&self, value: &Value) -> String {
        self.escaper.literal(self.conn.as_ref(), value)
    }

    /// Replace the SELECT projection. Not validated.
    pub fn select(&mut self, projection: &str) -> &mut Self {
        self.state.select = projection.to_string();
        self
    }

    /// Add WHERE terms. Map/pair values are escaped; bare strings are raw.
    pub fn and_where(&mut self, filter: impl Into<Filter>) -> &mut Self {
        match filter.into() {
            Filter::Raw(expr) => self.state.push_where(expr, None),
            Filter::Eq(data) => {
                for (field, value) in data {
                    let operand = self.literal(&value);
                    self.state.push_where(field, Some(operand));
                }
            }
        }
        self
    }

    /// Add HAVING terms. Operands are rendered verbatim, without escaping.
    pub fn and_having(&mut self, filter: impl Into<Filter>) -> &mut Self {
        match filter.into() {
            Filter::Raw(expr) => self.state.push_having(expr, None),
            Filter::Eq(data) => {
                for (field, value) in data {
                    self.state.push_having(field, Some(value.to_string()));
                }
            }
        }
        self
    }

    /// Add a plain `JOIN table ON on`.
    pub fn join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join_kind(table, on, "")
    }

    /// Add `LEFT JOIN table ON on`.
    pub fn left_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join_kind(table, on, "LEFT")
    }

    /// Add a join with a raw modifier token placed before `JOIN`.
    pub fn join_kind(&mut self, table: &str, on: &str, kind: &str) -> &mut Self {
        self.state.joins.push(Join {
            table: table.to_string(),
            on: on.to_string(),
            kind: kind.to_string(),
        });
        self
    }

    /// Set the ORDER BY term; replaces any previous one.
    pub fn order(&mut self, field: &str, direction: &str) -> &mut Self {
        self.state.order = Some(format!("{field} {direction}"));
        self
    }

    /// `order(field, "ASC")`.
    pub fn order_asc(&mut self, field: &str) -> &mut Self {
        self.order(field, "ASC")
    }

    /// Set the GROUP BY field; replaces any previous one.
    pub fn group(&mut self, field: &str) -> &mut Self {
        self.state.group = Some(field.to_string());
        self
    }

    /// Set LIMIT and OFFSET; replaces both.
    pub fn limit(&mut self, count: u64, offset: u64) -> &mut Self {
        self.state.limit = Some((count, offset));
        self
    }

    /// Discard all pending clauses.
    pub fn reset(&mut self) -> &mut Self {
        self.state.reset();
        self
    }

    // ==================== Statements ====================

    /// Render and run a SELECT against `table`, then reset.
    pub fn get(&mut self, table: &str) -> OrmResult<Box<dyn Cursor>> {
        let sql = self.state.select_sql(table);
        self.state.reset();
        Ok(self.query(&sql)?.into_cursor())
    }

    /// `and_where(filter)` followed by `get(table)`.
    pub fn get_where(&mut self, table: &str, filter: impl Into<Filter>) -> OrmResult<Box<dyn Cursor>> {
        self.and_where(filter);
        self.get(table)
    }

    /// Render and run an INSERT. Pending clause state is left untouched.
    pub fn create(&mut self, table: &str, data: &Data) -> OrmResult<u64> {
        let keys: Vec<&str> = data.keys().collect();
        let values: Vec<String> = data.iter().map(|(_, v)| self.literal(v)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            keys.join(","),
            values.join(",")
        );
        Ok(self.query(&sql)?.affected())
    }

    /// Render and run an UPDATE, then reset. Empty `data` omits `SET`.
    pub fn update(&mut self, table: &str, data: &Data) -> OrmResult<u64> {
        let assignments: Vec<String> = data
            .iter()
            .map(|(k, v)| format!("{} = {}", k, self.literal(v)))
            .collect();
        let sql = self.state.update_sql(table, &assignments);
        self.state.reset();
        Ok(self.query(&sql)?.affected())
    }

    /// `and_where(filter)` followed by `update(table, data)`.
    pub fn update_where(
        &mut self,
        table: &str,
        data: &Data,
        filter: impl Into<Filter>,
    ) -> OrmResult<u64> {
        self.and_where(filter);
        self.update(table, data)
    }

    /// Render and run a DELETE, then reset.
    pub fn destroy(&mut self, table: &str) -> OrmResult<u64> {
        let sql = self.state.delete_sql(table);
        self.state.reset();
        Ok(self.query(&sql)?.affected())
    }

    /// `and_where(filter)` followed by `destroy(table)`.
    pub fn destroy_where(&mut self, table: &str, filter: impl Into<Filter>) -> OrmResult<u64> {
        self.and_where(filter);
        self.destroy(table)
    }

    /// Record and execute a statement as-is.
    pub fn query(&mut self, sql: &str) -> OrmResult<Outcome> {
        self.log.record(sql);
        #[cfg(feature = "tracing")]
        crate::monitor::trace_statement(sql);
        self.conn.execute(sql).inspect_err(|_err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(target: "sqlrow.sql", error = %_err, sql = %sql, "statement failed");
        })
    }

    /// Id generated by the most recent INSERT.
    pub fn last_insert_id(&self) -> Option<i64> {
        self.conn.last_insert_id()
    }

    /// Every statement executed through this context, in order.
    pub fn runtime_info(&self) -> RuntimeInfo {
        self.log.runtime_info()
    }

    pub fn statement_log(&self) -> &StatementLog {
        &self.log
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("state", &self.state)
            .field("statements", &self.log.len())
            .field("allow_manipulation", &self.allow_manipulation)
            .finish_non_exhaustive()
    }
}
