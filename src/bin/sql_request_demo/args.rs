use std::path::PathBuf;

use clap::Parser;
use sql_request::prelude::*;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about = "Walk through SqlRequest against the demo Test table")]
pub(crate) struct Args {
    /// JSON connection target, e.g. {"backend":"sqlite","db_path":"demo.db"}
    #[arg(long, conflicts_with = "from_env")]
    pub(crate) config: Option<PathBuf>,
    /// Read the connection target from SQL_REQUEST_* variables
    #[arg(long)]
    pub(crate) from_env: bool,
    /// SQLite file used when neither --config nor --from-env is given
    #[arg(long, default_value = "sql_request_demo.db")]
    pub(crate) db_path: String,
    #[arg(long, default_value_t = Level::INFO)]
    pub(crate) log_level: Level,
}

impl Args {
    pub(crate) fn target(&self) -> Result<ConnectionTarget, SqlRequestError> {
        if let Some(path) = &self.config {
            return ConnectionTarget::from_json_file(path);
        }
        if self.from_env {
            return ConnectionTarget::from_env();
        }
        default_target(&self.db_path)
    }
}

#[cfg(feature = "sqlite")]
fn default_target(db_path: &str) -> Result<ConnectionTarget, SqlRequestError> {
    Ok(ConnectionTarget::Sqlite(SqliteOptions::new(db_path)))
}

#[cfg(not(feature = "sqlite"))]
fn default_target(_db_path: &str) -> Result<ConnectionTarget, SqlRequestError> {
    Err(SqlRequestError::ConfigError(
        "no SQLite support in this build; pass --config or --from-env".into(),
    ))
}
