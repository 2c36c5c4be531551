//! Error types for sqlrow

use thiserror::Error;

/// Result type alias for sqlrow operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution error reported by the connection
    #[error("Query error: {0}")]
    Query(String),

    /// A value that cannot be rendered as a SQL literal
    #[error("Non-scalar value for field '{field}'")]
    NonScalar { field: String },

    /// A hook list names a handler the model never registered
    #[error("Hook '{hook}' references unknown handler '{handler}'")]
    UnknownHandler { hook: String, handler: String },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a query execution error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Create a non-scalar error for a field
    pub fn non_scalar(field: impl Into<String>) -> Self {
        Self::NonScalar {
            field: field.into(),
        }
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if this is a query execution error
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}
