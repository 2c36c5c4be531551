//! Schema manipulation.
//!
//! Everything here except [`Db::table_exists`] is gated behind
//! [`Db::allow_manipulation`]. While disabled, calls return `Ok(())` without
//! touching the connection.

use super::Db;
use crate::error::OrmResult;

/// A column definition for [`Db::add_column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Definition text placed verbatim after the column name.
    Raw(String),
    Def(ColumnDef),
}

impl From<&str> for ColumnSpec {
    fn from(def: &str) -> Self {
        ColumnSpec::Raw(def.to_string())
    }
}

impl From<ColumnDef> for ColumnSpec {
    fn from(def: ColumnDef) -> Self {
        ColumnSpec::Def(def)
    }
}

/// Structured column definition. Columns are `NOT NULL` unless `nullable`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDef {
    pub type_name: String,
    pub constraint: Option<String>,
    pub nullable: bool,
    pub default: Option<String>,
    pub auto_increment: bool,
}

impl ColumnDef {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Size/precision placed in parentheses after the type, e.g. `255`.
    pub fn constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }
}

impl Db {
    /// Enable or disable schema manipulation.
    pub fn allow_manipulation(&mut self, allow: bool) -> &mut Self {
        self.allow_manipulation = allow;
        self
    }

    pub fn manipulation_allowed(&self) -> bool {
        self.allow_manipulation
    }

    fn manipulation_gate(&self, _operation: &str) -> bool {
        #[cfg(feature = "tracing")]
        if !self.allow_manipulation {
            tracing::debug!(operation = _operation, "schema manipulation disabled; ignoring");
        }
        self.allow_manipulation
    }

    /// True when `SELECT 1 FROM table` returns any row.
    pub fn table_exists(&mut self, table: &str) -> OrmResult<bool> {
        let table = self.conn.escape_identifier(table);
        let cursor = self.query(&format!("SELECT 1 FROM {table}"))?.into_cursor();
        Ok(cursor.row_count() > 0)
    }

    pub fn create_table(&mut self, table: &str, if_not_exists: bool) -> OrmResult<()> {
        if !self.manipulation_gate("create_table") {
            return Ok(());
        }
        let table = self.conn.escape_identifier(table);
        let guard = if if_not_exists { " IF NOT EXISTS" } else { "" };
        self.query(&format!("CREATE TABLE{guard} {table}"))?;
        Ok(())
    }

    pub fn rename_table(&mut self, old: &str, new: &str) -> OrmResult<()> {
        if !self.manipulation_gate("rename_table") {
            return Ok(());
        }
        let old = self.conn.escape_identifier(old);
        let new = self.conn.escape_identifier(new);
        self.query(&format!("ALTER TABLE {old} RENAME TO {new}"))?;
        Ok(())
    }

    pub fn drop_table(&mut self, table: &str, if_exists: bool) -> OrmResult<()> {
        if !self.manipulation_gate("drop_table") {
            return Ok(());
        }
        let table = self.conn.escape_identifier(table);
        let guard = if if_exists { " IF EXISTS" } else { "" };
        self.query(&format!("DROP TABLE{guard} {table}"))?;
        Ok(())
    }

    /// Issue one `ALTER TABLE .. ADD ..` per column, in order.
    pub fn add_column(&mut self, table: &str, columns: &[(&str, ColumnSpec)]) -> OrmResult<()> {
        if !self.manipulation_gate("add_column") {
            return Ok(());
        }
        let table = self.conn.escape_identifier(table);
        for (name, spec) in columns {
            let field = self.column_sql(name, spec);
            self.query(&format!("ALTER TABLE {table} ADD {field}"))?;
        }
        Ok(())
    }

    fn column_sql(&self, name: &str, spec: &ColumnSpec) -> String {
        match spec {
            ColumnSpec::Raw(def) => format!("{name} {def}"),
            ColumnSpec::Def(def) => {
                let mut field = format!("{} {}", name, def.type_name);
                if let Some(constraint) = &def.constraint {
                    field.push_str(&format!("({constraint})"));
                }
                field.push_str(if def.nullable { " NULL" } else { " NOT NULL" });
                if let Some(default) = &def.default {
                    field.push_str(&format!(" DEFAULT '{}'", self.conn.escape(default)));
                }
                if def.auto_increment {
                    field.push_str(" AUTO_INCREMENT");
                }
                field
            }
        }
    }
}
