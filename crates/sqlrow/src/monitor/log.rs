use super::types::QueryType;

/// Append-only record of every statement executed through one context.
#[derive(Debug, Clone, Default)]
pub struct StatementLog {
    statements: Vec<String>,
}

impl StatementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sql: &str) {
        self.statements.push(sql.to_string());
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// The most recently recorded statement.
    pub fn last(&self) -> Option<&str> {
        self.statements.last().map(String::as_str)
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Snapshot for diagnostics.
    pub fn runtime_info(&self) -> RuntimeInfo {
        RuntimeInfo {
            total: self.statements.len(),
            statements: self.statements.clone(),
        }
    }
}

/// Snapshot of a [`StatementLog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RuntimeInfo {
    /// Number of statements executed.
    pub total: usize,
    /// Statements in execution order.
    pub statements: Vec<String>,
}

impl RuntimeInfo {
    /// Number of statements of the given kind.
    pub fn count(&self, query_type: QueryType) -> usize {
        self.statements
            .iter()
            .filter(|sql| QueryType::from_sql(sql) == query_type)
            .count()
    }

    /// Statements recorded after the first `skip`.
    pub fn since(&self, skip: usize) -> &[String] {
        self.statements.get(skip..).unwrap_or(&[])
    }
}
