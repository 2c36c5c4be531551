//! Statement log and diagnostics.
//!
//! Every statement rendered by [`crate::Db`] is recorded here before it is
//! sent to the connection, so failed statements show up too.
//!
//! # Example
//!
//! ```ignore
//! let info = db.runtime_info();
//! println!("{} statements", info.total);
//! for sql in &info.statements {
//!     println!("{sql}");
//! }
//! ```

mod log;
mod types;

#[cfg(test)]
mod tests;

pub use log::{RuntimeInfo, StatementLog};
pub use types::QueryType;

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Emit one executed statement on the `sqlrow.sql` target.
#[cfg(feature = "tracing")]
pub(crate) fn trace_statement(sql: &str) {
    const MAX_SQL_LENGTH: usize = 500;
    let query_type = QueryType::from_sql(sql);
    if sql.len() > MAX_SQL_LENGTH {
        tracing::debug!(
            target: "sqlrow.sql",
            query_type = ?query_type,
            sql = %format_args!("{}...", truncate_sql_bytes(sql, MAX_SQL_LENGTH)),
        );
    } else {
        tracing::debug!(target: "sqlrow.sql", query_type = ?query_type, sql = %sql);
    }
}
