//! Synchronous parameterized-query facade.
//!
//! A [`SqlRequest`] owns one database connection and runs prepared statements
//! in three shapes: a per-row callback ([`SqlRequest::read_rows`]), an
//! affected-row count ([`SqlRequest::execute`]) and a single value
//! ([`SqlRequest::scalar`]). Arguments are bound either by position (`@0`,
//! `@1`, ...) or by name through [`Placeholder`] (`@id`).
//!
//! Backends: `SQLite` through rusqlite (feature `sqlite`, default) and SQL
//! Server through tiberius (feature `mssql`).

#[cfg(not(any(feature = "sqlite", feature = "mssql")))]
compile_error!("enable at least one backend feature: `sqlite` or `mssql`");

pub mod config;
pub mod error;
pub mod placeholder;
pub mod prelude;
pub mod request;
pub mod results;
pub mod translation;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::ConnectionTarget;
pub use error::SqlRequestError;
pub use placeholder::Placeholder;
pub use request::SqlRequest;
pub use results::SqlRow;
pub use types::{DatabaseType, RowValues};
