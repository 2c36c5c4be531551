//! Connection and builder configuration.

use crate::escape::DEFAULT_RAW_MARKERS;
use std::env;

/// Parameters handed to a [`crate::Connector`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectionConfig {
    /// Create a configuration with empty fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `SQLROW_HOST`, `SQLROW_USER`, `SQLROW_PASSWORD` and
    /// `SQLROW_DATABASE`. Missing variables are left empty.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).unwrap_or_default();
        Self {
            host: var("SQLROW_HOST"),
            user: var("SQLROW_USER"),
            password: var("SQLROW_PASSWORD"),
            database: var("SQLROW_DATABASE"),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

/// Behaviour switches for [`crate::Db`].
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Allow schema manipulation (`create_table`, `drop_table`, ...).
    /// When false those calls do nothing.
    pub allow_manipulation: bool,
    /// Function names whose calls are passed through unescaped.
    pub raw_markers: Vec<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            allow_manipulation: false,
            raw_markers: DEFAULT_RAW_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl DbConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable schema manipulation.
    pub fn allow_manipulation(mut self, allow: bool) -> Self {
        self.allow_manipulation = allow;
        self
    }

    /// Replace the raw function marker list.
    pub fn raw_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Add one raw function marker.
    pub fn add_raw_marker(mut self, marker: impl Into<String>) -> Self {
        self.raw_markers.push(marker.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::new();
        assert!(!config.allow_manipulation);
        assert_eq!(config.raw_markers, ["FROM_UNIXTIME", "UNIX_TIMESTAMP", "NOW"]);
    }

    #[test]
    fn test_connection_config_builder() {
        let config = ConnectionConfig::new()
            .host("localhost")
            .user("app")
            .password("secret")
            .database("shop");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.database, "shop");
    }
}
