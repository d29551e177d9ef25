pub mod bindings;

use tracing::{debug, info, warn};

use crate::config::ConnectionTarget;
use crate::error::SqlRequestError;
use crate::placeholder::Placeholder;
use crate::results::SqlRow;
use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "mssql")]
use crate::mssql::{MssqlOptions, MssqlOptionsBuilder, MssqlSession};
#[cfg(feature = "sqlite")]
use crate::sqlite::{self, SqliteOptions, SqliteOptionsBuilder};

use bindings::ParamBindings;

/// The live connection behind a `SqlRequest`.
#[derive(Debug)]
enum RequestConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Connection),
    #[cfg(feature = "mssql")]
    Mssql(Box<MssqlSession>),
}

/// A single database connection with prepared, parameterized execution.
///
/// Every operation prepares its own statement, binds the arguments, runs it
/// and releases the statement before returning; the connection stays open
/// until [`close`](SqlRequest::close) or drop. Each operation comes in two
/// flavors:
///
/// - positional: `&[RowValues]`, bound to `@0`, `@1`, ... in the query text;
/// - named: `&[Placeholder]`, each bound to `@<name>`.
///
/// Operations take `&mut self`, so a request runs at most one statement at a
/// time. It is not meant to be shared across threads; wrap it in a `Mutex` if
/// it has to be. After an operation fails the request can still be closed
/// safely, but open a new one before running more statements.
///
/// ```rust,no_run
/// use sql_request::prelude::*;
///
/// # fn main() -> Result<(), SqlRequestError> {
/// let mut request = SqlRequest::sqlite_builder("demo.db").build()?;
/// request.read_rows(
///     "SELECT id, prenom FROM Test WHERE id = @0",
///     |row| {
///         println!("{} {}", row.get_int(0)?, row.get_text(1)?);
///         Ok(())
///     },
///     &[RowValues::Int(2)],
/// )?;
/// let id = request.scalar_named(
///     "INSERT INTO Test (prenom, nom) VALUES (@pre, @nom) RETURNING id",
///     &[Placeholder::new("pre", "Youpi"), Placeholder::new("nom", "Lavie")],
/// )?;
/// # let _ = id;
/// request.close()
/// # }
/// ```
#[derive(Debug)]
pub struct SqlRequest {
    conn: Option<RequestConnection>,
    db_type: DatabaseType,
}

impl SqlRequest {
    /// Open a connection to `target`.
    ///
    /// # Errors
    /// Returns the connection error of the backend; no request is created.
    pub fn connect(target: &ConnectionTarget) -> Result<Self, SqlRequestError> {
        match target {
            #[cfg(feature = "sqlite")]
            ConnectionTarget::Sqlite(opts) => Self::open_sqlite(opts),
            #[cfg(feature = "mssql")]
            ConnectionTarget::Mssql(opts) => Self::open_mssql(opts),
        }
    }

    #[cfg(feature = "sqlite")]
    #[must_use]
    pub fn sqlite_builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Open a `SQLite` database.
    ///
    /// # Errors
    /// Returns `SqlRequestError::SqliteError` if the database cannot be opened.
    #[cfg(feature = "sqlite")]
    pub fn open_sqlite(opts: &SqliteOptions) -> Result<Self, SqlRequestError> {
        let conn = sqlite::config::open_connection(opts)?;
        info!(path = %opts.db_path, "sqlite connection opened");
        Ok(Self {
            conn: Some(RequestConnection::Sqlite(conn)),
            db_type: DatabaseType::Sqlite,
        })
    }

    #[cfg(feature = "mssql")]
    #[must_use]
    pub fn mssql_builder(
        server: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> MssqlOptionsBuilder {
        MssqlOptionsBuilder::new(server, database, user, password)
    }

    /// Connect to SQL Server.
    ///
    /// # Errors
    /// Returns `SqlRequestError::ConnectionError` if the server cannot be
    /// reached or the login fails.
    #[cfg(feature = "mssql")]
    pub fn open_mssql(opts: &MssqlOptions) -> Result<Self, SqlRequestError> {
        let session = MssqlSession::connect(opts)?;
        info!(server = %opts.server, database = %opts.database, "sql server connection opened");
        Ok(Self {
            conn: Some(RequestConnection::Mssql(Box::new(session))),
            db_type: DatabaseType::Mssql,
        })
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Run a row-producing query and call `handler` once per row, in result
    /// order. Arguments bind to `@0`, `@1`, ...
    ///
    /// An `Err` from the handler stops the read and is returned as is.
    ///
    /// # Errors
    /// Returns the driver error from prepare/bind/execute, a
    /// `ParameterError` for a binding mismatch, `ConnectionClosed` after
    /// `close`, or the handler's error.
    pub fn read_rows<F>(
        &mut self,
        query: &str,
        handler: F,
        args: &[RowValues],
    ) -> Result<(), SqlRequestError>
    where
        F: FnMut(&SqlRow) -> Result<(), SqlRequestError>,
    {
        self.read_bound(query, handler, &ParamBindings::positional(args))
    }

    /// [`read_rows`](Self::read_rows) with named placeholders.
    ///
    /// # Errors
    /// As `read_rows`; also `ParameterError` for an empty, prefixed or
    /// duplicated placeholder name.
    pub fn read_rows_named<F>(
        &mut self,
        query: &str,
        handler: F,
        args: &[Placeholder],
    ) -> Result<(), SqlRequestError>
    where
        F: FnMut(&SqlRow) -> Result<(), SqlRequestError>,
    {
        let bindings = ParamBindings::named(args)?;
        self.read_bound(query, handler, &bindings)
    }

    /// Run a statement and return the number of rows it affected (0 for a
    /// statement that matched nothing, DDL or a plain `SELECT`). Rows from a
    /// returning clause are read to completion and discarded.
    ///
    /// # Errors
    /// Returns the driver error from prepare/bind/execute, a
    /// `ParameterError` for a binding mismatch, or `ConnectionClosed`.
    pub fn execute(&mut self, query: &str, args: &[RowValues]) -> Result<usize, SqlRequestError> {
        self.execute_bound(query, &ParamBindings::positional(args))
    }

    /// [`execute`](Self::execute) with named placeholders.
    ///
    /// # Errors
    /// As `execute`; also `ParameterError` for a bad placeholder name.
    pub fn execute_named(
        &mut self,
        query: &str,
        args: &[Placeholder],
    ) -> Result<usize, SqlRequestError> {
        let bindings = ParamBindings::named(args)?;
        self.execute_bound(query, &bindings)
    }

    /// Run a statement and return the first column of its first row.
    ///
    /// `Ok(None)` when the result is empty or that cell is NULL. Also the way
    /// to read back a key from a returning clause (`RETURNING id`,
    /// `OUTPUT INSERTED.id`).
    ///
    /// # Errors
    /// Returns the driver error from prepare/bind/execute, a
    /// `ParameterError` for a binding mismatch, or `ConnectionClosed`.
    pub fn scalar(
        &mut self,
        query: &str,
        args: &[RowValues],
    ) -> Result<Option<RowValues>, SqlRequestError> {
        self.scalar_bound(query, &ParamBindings::positional(args))
    }

    /// [`scalar`](Self::scalar) with named placeholders.
    ///
    /// # Errors
    /// As `scalar`; also `ParameterError` for a bad placeholder name.
    pub fn scalar_named(
        &mut self,
        query: &str,
        args: &[Placeholder],
    ) -> Result<Option<RowValues>, SqlRequestError> {
        let bindings = ParamBindings::named(args)?;
        self.scalar_bound(query, &bindings)
    }

    /// Close the connection.
    ///
    /// Only the first call reaches the driver; later calls return `Ok(())`.
    ///
    /// # Errors
    /// Returns the driver error if closing fails. The connection is released
    /// either way.
    pub fn close(&mut self) -> Result<(), SqlRequestError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        info!(db_type = ?self.db_type, "closing connection");
        match conn {
            #[cfg(feature = "sqlite")]
            RequestConnection::Sqlite(conn) => conn.close().map_err(|(_, err)| err.into()),
            #[cfg(feature = "mssql")]
            RequestConnection::Mssql(session) => session.close(),
        }
    }

    fn connection(&mut self) -> Result<&mut RequestConnection, SqlRequestError> {
        self.conn.as_mut().ok_or(SqlRequestError::ConnectionClosed)
    }

    fn read_bound<F>(
        &mut self,
        query: &str,
        handler: F,
        bindings: &ParamBindings<'_>,
    ) -> Result<(), SqlRequestError>
    where
        F: FnMut(&SqlRow) -> Result<(), SqlRequestError>,
    {
        match self.connection()? {
            #[cfg(feature = "sqlite")]
            RequestConnection::Sqlite(conn) => sqlite::read_rows(conn, query, bindings, handler),
            #[cfg(feature = "mssql")]
            RequestConnection::Mssql(session) => session.read_rows(query, bindings, handler),
        }
    }

    fn execute_bound(
        &mut self,
        query: &str,
        bindings: &ParamBindings<'_>,
    ) -> Result<usize, SqlRequestError> {
        let affected = match self.connection()? {
            #[cfg(feature = "sqlite")]
            RequestConnection::Sqlite(conn) => sqlite::execute_change(conn, query, bindings),
            #[cfg(feature = "mssql")]
            RequestConnection::Mssql(session) => session.execute_change(query, bindings),
        }?;
        debug!(affected, "statement executed");
        Ok(affected)
    }

    fn scalar_bound(
        &mut self,
        query: &str,
        bindings: &ParamBindings<'_>,
    ) -> Result<Option<RowValues>, SqlRequestError> {
        match self.connection()? {
            #[cfg(feature = "sqlite")]
            RequestConnection::Sqlite(conn) => sqlite::execute_scalar(conn, query, bindings),
            #[cfg(feature = "mssql")]
            RequestConnection::Mssql(session) => session.execute_scalar(query, bindings),
        }
    }
}

impl Drop for SqlRequest {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("failed to close connection on drop: {err}");
        }
    }
}
