use rusqlite::{Connection, OpenFlags};
use serde::Deserialize;

use crate::error::SqlRequestError;
use crate::request::SqlRequest;

/// Options for opening a `SQLite` database.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Create the file when it does not exist yet.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

fn default_create_if_missing() -> bool {
    true
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            create_if_missing: true,
        }
    }

    #[must_use]
    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    pub(crate) fn open_flags(&self) -> OpenFlags {
        let mut flags =
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
        flags
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.opts.create_if_missing = create_if_missing;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open the database and wrap it in a `SqlRequest`.
    ///
    /// # Errors
    ///
    /// Returns `SqlRequestError` if the database cannot be opened.
    pub fn build(self) -> Result<SqlRequest, SqlRequestError> {
        SqlRequest::open_sqlite(&self.finish())
    }
}

/// Open a `SQLite` connection for the given options.
///
/// # Errors
/// Returns `SqlRequestError::SqliteError` if the file cannot be opened (missing
/// directory, missing file without `create_if_missing`, not a database).
pub(crate) fn open_connection(opts: &SqliteOptions) -> Result<Connection, SqlRequestError> {
    let conn = Connection::open_with_flags(&opts.db_path, opts.open_flags())?;
    // Opening is lazy; read the schema so a non-database file fails here.
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))?;
    Ok(conn)
}
