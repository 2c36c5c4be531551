//! A scripted in-memory connection for tests and examples.
//!
//! [`MockConnection`] is cheap to clone; all clones share state, so a test can
//! keep a handle after moving one into a [`crate::Db`].
//!
//! ```ignore
//! use sqlrow::mock::MockConnection;
//! use sqlrow::{Data, Db};
//!
//! let conn = MockConnection::new();
//! conn.on_query("FROM widget", vec![Data::new().set("widget_id", 5)]);
//! let mut db = Db::new(conn.clone());
//! ```

use crate::config::ConnectionConfig;
use crate::connection::{Connection, Connector, Outcome, VecCursor};
use crate::error::{OrmError, OrmResult};
use crate::monitor::QueryType;
use crate::value::Data;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
enum Response {
    Rows(Vec<Data>),
    Affected(u64),
    Fail(String),
}

#[derive(Debug)]
struct Rule {
    pattern: String,
    response: Response,
}

#[derive(Debug, Default)]
struct MockState {
    rules: Vec<Rule>,
    executed: Vec<String>,
    next_insert_id: i64,
    last_insert_id: Option<i64>,
    connected_with: Option<ConnectionConfig>,
}

/// Connection whose responses are matched by SQL substring.
///
/// Rules are checked in registration order; the first rule whose pattern is
/// contained in the statement wins. Without a match, SELECTs return no rows,
/// INSERTs allocate the next id and everything else reports one affected row.
#[derive(Debug, Clone)]
pub struct MockConnection {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                next_insert_id: 1,
                ..MockState::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push_rule(&self, pattern: &str, response: Response) -> &Self {
        self.state().rules.push(Rule {
            pattern: pattern.to_string(),
            response,
        });
        self
    }

    /// Answer statements containing `pattern` with `rows`.
    pub fn on_query(&self, pattern: &str, rows: Vec<Data>) -> &Self {
        self.push_rule(pattern, Response::Rows(rows))
    }

    /// Answer statements containing `pattern` with an affected-row count.
    pub fn on_execute(&self, pattern: &str, affected: u64) -> &Self {
        self.push_rule(pattern, Response::Affected(affected))
    }

    /// Fail statements containing `pattern`.
    pub fn fail_on(&self, pattern: &str, message: &str) -> &Self {
        self.push_rule(pattern, Response::Fail(message.to_string()))
    }

    /// Id handed out by the next INSERT.
    pub fn set_next_insert_id(&self, id: i64) -> &Self {
        self.state().next_insert_id = id;
        self
    }

    /// Statements that reached the connection, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state().executed.clone()
    }

    /// Configuration passed to [`Connector::connect`], if any.
    pub fn connected_with(&self) -> Option<ConnectionConfig> {
        self.state().connected_with.clone()
    }
}

impl Connection for MockConnection {
    fn execute(&mut self, sql: &str) -> OrmResult<Outcome> {
        let mut state = self.state();
        state.executed.push(sql.to_string());

        let matched = state
            .rules
            .iter()
            .find(|rule| sql.contains(&rule.pattern))
            .map(|rule| match &rule.response {
                Response::Rows(rows) => Ok(Outcome::Rows(Box::new(VecCursor::new(rows.clone())))),
                Response::Affected(n) => Ok(Outcome::Affected(*n)),
                Response::Fail(message) => Err(OrmError::query(message.clone())),
            });

        let query_type = QueryType::from_sql(sql);
        if query_type == QueryType::Insert {
            let id = state.next_insert_id;
            state.next_insert_id += 1;
            state.last_insert_id = Some(id);
        }

        match matched {
            Some(outcome) => outcome,
            None if query_type == QueryType::Select => {
                Ok(Outcome::Rows(Box::new(VecCursor::default())))
            }
            None => Ok(Outcome::Affected(1)),
        }
    }

    fn last_insert_id(&self) -> Option<i64> {
        self.state().last_insert_id
    }
}

impl Connector for MockConnection {
    fn connect(&self, config: &ConnectionConfig) -> OrmResult<Box<dyn Connection>> {
        self.state().connected_with = Some(config.clone());
        Ok(Box::new(self.clone()))
    }
}
