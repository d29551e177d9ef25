// MSSQL module - tiberius backend for SqlRequest
//
// - config: connection options and builder
// - client: connection setup and the blocking session
// - params: placeholder rewriting and parameter binding
// - query: the three execution shapes and row decoding

pub mod client;
pub mod config;
mod params;
mod query;

pub use client::{MssqlClient, MssqlSession, create_mssql_client};
pub use config::{MssqlOptions, MssqlOptionsBuilder};
