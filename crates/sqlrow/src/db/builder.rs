//! Clause state for the one pending statement and its rendering.

use crate::value::{Data, Value};

/// Argument accepted by `and_where` / `and_having`.
///
/// - a bare string is a raw predicate (`"age > 18"`, `"id IN (1,2,3)"`);
/// - a `(field, value)` pair or a [`Data`] map adds `field = value` terms.
///
/// A pair whose value is null or empty text degrades to a raw predicate
/// made of the field alone. Zero, `"0"` and `false` are real values and
/// still produce `field = value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Raw(String),
    Eq(Data),
}

impl From<&str> for Filter {
    fn from(expr: &str) -> Self {
        Filter::Raw(expr.to_string())
    }
}

impl From<String> for Filter {
    fn from(expr: String) -> Self {
        Filter::Raw(expr)
    }
}

impl From<Data> for Filter {
    fn from(data: Data) -> Self {
        Filter::Eq(data)
    }
}

impl From<&Data> for Filter {
    fn from(data: &Data) -> Self {
        Filter::Eq(data.clone())
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Filter {
    fn from((field, value): (K, V)) -> Self {
        let field = field.into();
        let value = value.into();
        let empty = match &value {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        };
        if empty {
            Filter::Raw(field)
        } else {
            Filter::Eq(Data::new().set(field, value))
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Filter {
    fn from(entries: [(K, V); N]) -> Self {
        Filter::Eq(Data::from(entries))
    }
}

/// One WHERE/HAVING term. `operand` is already rendered; `None` means the
/// expression is raw SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub expr: String,
    pub operand: Option<String>,
}

impl Predicate {
    fn render(&self) -> String {
        match &self.operand {
            Some(operand) => format!("{} = {}", self.expr, operand),
            None => self.expr.clone(),
        }
    }
}

/// One JOIN. `kind` is a raw modifier placed before `JOIN` (`"LEFT"`, `""`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub on: String,
    pub kind: String,
}

/// Accumulated clauses for the pending statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// SELECT projection (default `*`)
    pub(crate) select: String,
    /// JOIN clauses
    pub(crate) joins: Vec<Join>,
    /// WHERE terms, joined with AND
    pub(crate) wheres: Vec<Predicate>,
    /// HAVING terms, joined with AND
    pub(crate) havings: Vec<Predicate>,
    /// ORDER BY term (`field dir`)
    pub(crate) order: Option<String>,
    /// GROUP BY field
    pub(crate) group: Option<String>,
    /// (count, offset)
    pub(crate) limit: Option<(u64, u64)>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            select: "*".to_string(),
            joins: Vec::new(),
            wheres: Vec::new(),
            havings: Vec::new(),
            order: None,
            group: None,
            limit: None,
        }
    }
}

impl QueryState {
    /// True when no clause has been set since the last reset.
    pub fn is_reset(&self) -> bool {
        *self == Self::default()
    }

    pub fn projection(&self) -> &str {
        &self.select
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn wheres(&self) -> &[Predicate] {
        &self.wheres
    }

    pub fn havings(&self) -> &[Predicate] {
        &self.havings
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn push_where(&mut self, expr: String, operand: Option<String>) {
        self.wheres.push(Predicate { expr, operand });
    }

    pub(crate) fn push_having(&mut self, expr: String, operand: Option<String>) {
        self.havings.push(Predicate { expr, operand });
    }

    fn build_predicates(keyword: &str, terms: &[Predicate]) -> String {
        if terms.is_empty() {
            return String::new();
        }
        let sets: Vec<String> = terms.iter().map(Predicate::render).collect();
        format!(" {} {}", keyword, sets.join(" AND "))
    }

    pub(crate) fn build_join(&self) -> String {
        if self.joins.is_empty() {
            return String::new();
        }
        let joins: Vec<String> = self
            .joins
            .iter()
            .map(|j| {
                let kind = if j.kind.is_empty() {
                    String::new()
                } else {
                    format!("{} ", j.kind)
                };
                format!("{}JOIN {} ON {}", kind, j.table, j.on)
            })
            .collect();
        format!(" {}", joins.join(" "))
    }

    pub(crate) fn build_where(&self) -> String {
        Self::build_predicates("WHERE", &self.wheres)
    }

    pub(crate) fn build_having(&self) -> String {
        Self::build_predicates("HAVING", &self.havings)
    }

    pub(crate) fn build_group(&self) -> String {
        match &self.group {
            Some(group) => format!(" GROUP BY {group}"),
            None => String::new(),
        }
    }

    pub(crate) fn build_order(&self) -> String {
        match &self.order {
            Some(order) => format!(" ORDER BY {order}"),
            None => String::new(),
        }
    }

    pub(crate) fn build_limit(&self) -> String {
        match self.limit {
            Some((count, 0)) => format!(" LIMIT {count}"),
            Some((count, offset)) => format!(" LIMIT {offset}, {count}"),
            None => String::new(),
        }
    }

    /// `SELECT .. FROM .. JOIN .. WHERE .. GROUP BY .. HAVING .. ORDER BY .. LIMIT ..`
    pub(crate) fn select_sql(&self, table: &str) -> String {
        format!(
            "SELECT {} FROM {}{}{}{}{}{}{}",
            self.select,
            table,
            self.build_join(),
            self.build_where(),
            self.build_group(),
            self.build_having(),
            self.build_order(),
            self.build_limit()
        )
    }

    /// `UPDATE .. [SET ..] WHERE .. ORDER BY .. LIMIT ..`; an empty
    /// assignment list omits `SET` entirely.
    pub(crate) fn update_sql(&self, table: &str, assignments: &[String]) -> String {
        let set = if assignments.is_empty() {
            String::new()
        } else {
            format!(" SET {}", assignments.join(", "))
        };
        format!(
            "UPDATE {}{}{}{}{}",
            table,
            set,
            self.build_where(),
            self.build_order(),
            self.build_limit()
        )
    }

    pub(crate) fn delete_sql(&self, table: &str) -> String {
        format!(
            "DELETE FROM {}{}{}{}",
            table,
            self.build_where(),
            self.build_order(),
            self.build_limit()
        )
    }
}
