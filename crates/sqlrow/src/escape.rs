//! Literal escaping.
//!
//! Scalars are quoted with `"` and escaped through the connection, except for
//! text that carries one of the configured SQL function markers (`NOW(`,
//! `FROM_UNIXTIME(`, ...). Such text is passed through untouched. This is a
//! narrow compatibility allow-list, not injection protection; new code should
//! use [`crate::raw`] to opt in to verbatim fragments explicitly.

use crate::connection::Connection;
use crate::value::{DATETIME_FORMAT, Value};

/// SQL functions whose calls are passed through unquoted by default.
pub const DEFAULT_RAW_MARKERS: &[&str] = &["FROM_UNIXTIME", "UNIX_TIMESTAMP", "NOW"];

/// Escape a string for use inside a quoted literal (MySQL family rules).
pub fn escape_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\x1a' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out
}

/// Renders [`Value`]s as SQL literals.
#[derive(Debug, Clone)]
pub struct Escaper {
    raw_markers: Vec<String>,
}

impl Default for Escaper {
    fn default() -> Self {
        Self::new(DEFAULT_RAW_MARKERS.iter().map(|m| m.to_string()).collect())
    }
}

impl Escaper {
    pub fn new(raw_markers: Vec<String>) -> Self {
        Self { raw_markers }
    }

    pub fn raw_markers(&self) -> &[String] {
        &self.raw_markers
    }

    /// True when `text` contains `<MARKER>(` for any configured marker.
    pub fn has_raw_marker(&self, text: &str) -> bool {
        self.raw_markers
            .iter()
            .any(|marker| text.contains(&format!("{marker}(")))
    }

    /// Render a value as a literal, escaping through `conn`.
    pub fn literal(&self, conn: &dyn Connection, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => value.to_string(),
            Value::Raw(expr) => expr.clone(),
            Value::Text(text) if self.has_raw_marker(text) => text.clone(),
            Value::Text(text) => format!("\"{}\"", conn.escape(text)),
            Value::DateTime(dt) => format!("\"{}\"", dt.format(DATETIME_FORMAT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockConnection;

    #[test]
    fn test_escape_string_quotes_and_controls() {
        assert_eq!(escape_string(r#"it's "x""#), r#"it\'s \"x\""#);
        assert_eq!(escape_string("a\\b\n"), "a\\\\b\\n");
    }

    #[test]
    fn test_marker_passthrough() {
        let conn = MockConnection::new();
        let escaper = Escaper::default();
        assert_eq!(escaper.literal(&conn, &Value::from("NOW()")), "NOW()");
        assert_eq!(
            escaper.literal(&conn, &Value::from("FROM_UNIXTIME(1700000000)")),
            "FROM_UNIXTIME(1700000000)"
        );
        // Marker must be followed by an opening paren.
        assert_eq!(escaper.literal(&conn, &Value::from("NOW")), "\"NOW\"");
    }

    #[test]
    fn test_text_is_quoted_and_escaped() {
        let conn = MockConnection::new();
        let escaper = Escaper::default();
        assert_eq!(
            escaper.literal(&conn, &Value::from(r#"say "hi""#)),
            r#""say \"hi\"""#
        );
    }

    #[test]
    fn test_custom_markers() {
        let conn = MockConnection::new();
        let escaper = Escaper::new(vec!["CURDATE".to_string()]);
        assert_eq!(escaper.literal(&conn, &Value::from("CURDATE()")), "CURDATE()");
        assert_eq!(escaper.literal(&conn, &Value::from("NOW()")), "\"NOW()\"");
    }

    #[test]
    fn test_non_text_scalars() {
        let conn = MockConnection::new();
        let escaper = Escaper::default();
        assert_eq!(escaper.literal(&conn, &Value::Int(5)), "5");
        assert_eq!(escaper.literal(&conn, &Value::Bool(true)), "1");
        assert_eq!(escaper.literal(&conn, &Value::Null), "NULL");
        assert_eq!(escaper.literal(&conn, &crate::raw("a + 1")), "a + 1");
    }
}
