use rusqlite::types::Value;

use crate::error::SqlRequestError;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlRequestError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlRequestError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Decode every column of `row`.
///
/// # Errors
///
/// Returns `SqlRequestError` if any value cannot be read.
pub fn sqlite_extract_row(
    row: &rusqlite::Row,
    col_count: usize,
) -> Result<Vec<RowValues>, SqlRequestError> {
    (0..col_count)
        .map(|i| sqlite_extract_value(row, i))
        .collect()
}
