//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types
//! to make it easier to get started with the library.

pub use crate::config::ConnectionTarget;
pub use crate::error::SqlRequestError;
pub use crate::placeholder::Placeholder;
pub use crate::request::SqlRequest;
pub use crate::results::{Columns, SqlRow};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};

#[cfg(feature = "mssql")]
pub use crate::mssql::{MssqlOptions, MssqlOptionsBuilder};
