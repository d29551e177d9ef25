pub mod row;

pub use row::{Columns, SqlRow};
