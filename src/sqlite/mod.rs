// SQLite module - rusqlite backend for SqlRequest
//
// - config: open options and builder
// - params: RowValues -> rusqlite values, named binding
// - query: row decoding
// - executor: the three execution shapes

pub mod config;
mod executor;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub(crate) use executor::{execute_change, execute_scalar, read_rows};
