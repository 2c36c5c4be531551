//! Connection collaborator traits.
//!
//! The transport itself lives outside this crate. A driver implements
//! [`Connection`] (and optionally [`Connector`]) and hands it to
//! [`crate::Db`], which owns it for the lifetime of the context.

use crate::config::ConnectionConfig;
use crate::error::OrmResult;
use crate::escape::escape_string;
use crate::value::Data;
use std::collections::VecDeque;

/// A row cursor returned by a read.
pub trait Cursor: Send {
    /// Number of rows in the result set.
    fn row_count(&self) -> usize;

    /// Fetch the next row, or `None` once exhausted.
    fn fetch_next(&mut self) -> OrmResult<Option<Data>>;
}

/// What a statement produced.
pub enum Outcome {
    /// A result set (SELECT and friends).
    Rows(Box<dyn Cursor>),
    /// An acknowledgment with the number of affected rows.
    Affected(u64),
}

impl Outcome {
    /// Convert into a cursor; acknowledgments become an empty cursor.
    pub fn into_cursor(self) -> Box<dyn Cursor> {
        match self {
            Outcome::Rows(cursor) => cursor,
            Outcome::Affected(_) => Box::new(VecCursor::default()),
        }
    }

    /// Affected-row count; for result sets, the number of rows returned.
    pub fn affected(&self) -> u64 {
        match self {
            Outcome::Rows(cursor) => cursor.row_count() as u64,
            Outcome::Affected(n) => *n,
        }
    }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Rows(cursor) => write!(f, "Rows({})", cursor.row_count()),
            Outcome::Affected(n) => write!(f, "Affected({n})"),
        }
    }
}

/// A live database connection.
///
/// Calls block until the server responds. Errors are returned as-is to the
/// caller; no retry happens at this layer.
pub trait Connection: Send {
    /// Escape a scalar for use inside a quoted literal.
    fn escape(&self, value: &str) -> String {
        escape_string(value)
    }

    /// Escape a table or column name.
    fn escape_identifier(&self, ident: &str) -> String {
        self.escape(ident)
    }

    /// Execute one SQL statement.
    fn execute(&mut self, sql: &str) -> OrmResult<Outcome>;

    /// Id generated by the most recent INSERT, if any.
    fn last_insert_id(&self) -> Option<i64>;
}

/// Opens connections from a [`ConnectionConfig`].
pub trait Connector {
    fn connect(&self, config: &ConnectionConfig) -> OrmResult<Box<dyn Connection>>;
}

/// In-memory cursor over already materialized rows.
#[derive(Debug, Clone, Default)]
pub struct VecCursor {
    rows: VecDeque<Data>,
    total: usize,
}

impl VecCursor {
    pub fn new(rows: Vec<Data>) -> Self {
        Self {
            total: rows.len(),
            rows: rows.into(),
        }
    }
}

impl Cursor for VecCursor {
    fn row_count(&self) -> usize {
        self.total
    }

    fn fetch_next(&mut self) -> OrmResult<Option<Data>> {
        Ok(self.rows.pop_front())
    }
}

/// Drain a cursor into a vector.
pub fn fetch_all(cursor: &mut dyn Cursor) -> OrmResult<Vec<Data>> {
    let mut rows = Vec::with_capacity(cursor.row_count());
    while let Some(row) = cursor.fetch_next()? {
        rows.push(row);
    }
    Ok(rows)
}
