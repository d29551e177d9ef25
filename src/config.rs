//! Where a [`SqlRequest`](crate::SqlRequest) connects to.
//!
//! A target can be built in code, read from a JSON file:
//! ```json
//! { "backend": "sqlite", "db_path": "demo.db" }
//! ```
//! or taken from `SQL_REQUEST_*` environment variables (see
//! [`ConnectionTarget::from_env`]).

use std::path::Path;

use serde::Deserialize;

use crate::error::SqlRequestError;
use crate::types::DatabaseType;

#[cfg(feature = "mssql")]
use crate::mssql::MssqlOptions;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteOptions;

/// Connection descriptor for one backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum ConnectionTarget {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOptions),
    #[cfg(feature = "mssql")]
    Mssql(MssqlOptions),
}

impl ConnectionTarget {
    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            ConnectionTarget::Sqlite(_) => DatabaseType::Sqlite,
            #[cfg(feature = "mssql")]
            ConnectionTarget::Mssql(_) => DatabaseType::Mssql,
        }
    }

    /// Parse a target from JSON text.
    ///
    /// # Errors
    /// Returns `SqlRequestError::ConfigError` for malformed JSON, an unknown
    /// backend or missing fields.
    pub fn from_json(text: &str) -> Result<Self, SqlRequestError> {
        serde_json::from_str(text)
            .map_err(|e| SqlRequestError::ConfigError(format!("invalid connection target: {e}")))
    }

    /// Read a target from a JSON file.
    ///
    /// # Errors
    /// Returns `SqlRequestError::ConfigError` if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SqlRequestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SqlRequestError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Build a target from the process environment.
    ///
    /// | variable | meaning |
    /// |---|---|
    /// | `SQL_REQUEST_BACKEND` | `sqlite` (default) or `mssql` |
    /// | `SQL_REQUEST_DB_PATH` | `SQLite` file, required for `sqlite` |
    /// | `SQL_REQUEST_MSSQL_SERVER`, `_DATABASE`, `_USER`, `_PASSWORD` | required for `mssql` |
    /// | `SQL_REQUEST_MSSQL_PORT`, `_INSTANCE` | optional |
    ///
    /// # Errors
    /// Returns `SqlRequestError::ConfigError` for a missing or invalid variable.
    pub fn from_env() -> Result<Self, SqlRequestError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `SqlRequestError::ConfigError` for a missing or invalid variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SqlRequestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("SQL_REQUEST_BACKEND").unwrap_or_else(|| "sqlite".to_string());
        let required = |key: &str| {
            lookup(key).ok_or_else(|| SqlRequestError::ConfigError(format!("{key} is not set")))
        };

        match backend.to_ascii_lowercase().as_str() {
            #[cfg(feature = "sqlite")]
            "sqlite" => Ok(ConnectionTarget::Sqlite(SqliteOptions::new(required(
                "SQL_REQUEST_DB_PATH",
            )?))),
            #[cfg(feature = "mssql")]
            "mssql" => {
                let port = lookup("SQL_REQUEST_MSSQL_PORT")
                    .map(|raw| {
                        raw.parse::<u16>().map_err(|e| {
                            SqlRequestError::ConfigError(format!(
                                "SQL_REQUEST_MSSQL_PORT '{raw}' is not a port: {e}"
                            ))
                        })
                    })
                    .transpose()?;
                let opts = MssqlOptions::new(
                    required("SQL_REQUEST_MSSQL_SERVER")?,
                    required("SQL_REQUEST_MSSQL_DATABASE")?,
                    required("SQL_REQUEST_MSSQL_USER")?,
                    required("SQL_REQUEST_MSSQL_PASSWORD")?,
                )
                .with_port(port)
                .with_instance_name(lookup("SQL_REQUEST_MSSQL_INSTANCE"));
                Ok(ConnectionTarget::Mssql(opts))
            }
            other => Err(SqlRequestError::Unimplemented(format!(
                "backend '{other}' is not compiled into this build"
            ))),
        }
    }
}
