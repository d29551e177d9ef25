use std::fmt;

use tiberius::{Client, SqlBrowser};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use super::config::{MssqlOptions, build_tiberius_config};
use super::query;
use crate::error::SqlRequestError;
use crate::request::bindings::ParamBindings;
use crate::results::SqlRow;
use crate::types::RowValues;

/// Type alias for SQL Server client
pub type MssqlClient = Client<Compat<TcpStream>>;

/// Open a new SQL Server connection.
///
/// Named instances are resolved through the SQL Browser service.
///
/// # Errors
/// Returns `SqlRequestError::ConnectionError` if the TCP connection or the
/// login fails.
pub async fn create_mssql_client(opts: &MssqlOptions) -> Result<MssqlClient, SqlRequestError> {
    let config = build_tiberius_config(opts);

    let tcp = if opts.instance_name.is_some() {
        TcpStream::connect_named(&config).await.map_err(|e| {
            SqlRequestError::ConnectionError(format!("SQL Browser lookup failed: {e}"))
        })?
    } else {
        TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| SqlRequestError::ConnectionError(format!("TCP connection error: {e}")))?
    };
    tcp.set_nodelay(true)
        .map_err(|e| SqlRequestError::ConnectionError(format!("TCP connection error: {e}")))?;

    Client::connect(config, tcp.compat_write())
        .await
        .map_err(|e| SqlRequestError::ConnectionError(format!("SQL Server connection error: {e}")))
}

/// One SQL Server connection driven synchronously.
///
/// tiberius is async-only, so the session owns a current-thread runtime and
/// blocks on it for every call. It must not be used from inside another
/// tokio runtime.
pub struct MssqlSession {
    client: MssqlClient,
    runtime: Runtime,
}

impl fmt::Debug for MssqlSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MssqlSession")
            .field("client", &"<MssqlClient>")
            .finish_non_exhaustive()
    }
}

impl MssqlSession {
    /// # Errors
    /// Returns `SqlRequestError` if the runtime cannot start or the connection fails.
    pub fn connect(opts: &MssqlOptions) -> Result<Self, SqlRequestError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                SqlRequestError::ConnectionError(format!("failed to start SQL Server runtime: {e}"))
            })?;
        debug!(server = %opts.server, database = %opts.database, "mssql connect");
        let client = runtime.block_on(create_mssql_client(opts))?;
        Ok(Self { client, runtime })
    }

    pub(crate) fn read_rows<F>(
        &mut self,
        sql: &str,
        bindings: &ParamBindings<'_>,
        handler: F,
    ) -> Result<(), SqlRequestError>
    where
        F: FnMut(&SqlRow) -> Result<(), SqlRequestError>,
    {
        self.runtime
            .block_on(query::read_rows(&mut self.client, sql, bindings, handler))
    }

    pub(crate) fn execute_change(
        &mut self,
        sql: &str,
        bindings: &ParamBindings<'_>,
    ) -> Result<usize, SqlRequestError> {
        self.runtime
            .block_on(query::execute_change(&mut self.client, sql, bindings))
    }

    pub(crate) fn execute_scalar(
        &mut self,
        sql: &str,
        bindings: &ParamBindings<'_>,
    ) -> Result<Option<RowValues>, SqlRequestError> {
        self.runtime
            .block_on(query::execute_scalar(&mut self.client, sql, bindings))
    }

    /// Send the logout and drop the connection.
    ///
    /// # Errors
    /// Returns the driver error if the server rejects the close.
    pub fn close(self) -> Result<(), SqlRequestError> {
        let Self { client, runtime } = self;
        runtime.block_on(client.close())?;
        Ok(())
    }
}
