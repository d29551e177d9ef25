use std::sync::Arc;

use rusqlite::{Connection, Statement};
use tracing::debug;

use crate::error::SqlRequestError;
use crate::request::bindings::ParamBindings;
use crate::results::{Columns, SqlRow};
use crate::types::RowValues;

use super::params::bind_params;
use super::query::{sqlite_extract_row, sqlite_extract_value};

/// Prepare `query` and bind `bindings` onto it. The statement is finalized
/// when the returned value drops.
fn prepare_bound<'c>(
    conn: &'c Connection,
    query: &str,
    bindings: &ParamBindings<'_>,
) -> Result<Statement<'c>, SqlRequestError> {
    debug!(params = bindings.len(), "sqlite prepare: {query}");
    let mut stmt = conn.prepare(query)?;
    bind_params(&mut stmt, bindings)?;
    Ok(stmt)
}

/// Run a row-producing statement and hand every row to `handler`, in order.
///
/// # Errors
/// Returns the first error from preparing, binding, stepping or the handler.
pub(crate) fn read_rows<F>(
    conn: &Connection,
    query: &str,
    bindings: &ParamBindings<'_>,
    mut handler: F,
) -> Result<(), SqlRequestError>
where
    F: FnMut(&SqlRow) -> Result<(), SqlRequestError>,
{
    let mut stmt = prepare_bound(conn, query, bindings)?;
    let columns = Arc::new(Columns::new(
        stmt.column_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    ));

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let values = sqlite_extract_row(row, columns.len())?;
        handler(&SqlRow::new(Arc::clone(&columns), values))?;
    }
    Ok(())
}

/// Run a statement to completion and return the number of rows it changed.
///
/// Rows produced by the statement (`RETURNING`, a plain `SELECT`) are stepped
/// through and discarded. Statements that change nothing, DDL included,
/// report 0.
///
/// # Errors
/// Returns the driver error from preparing, binding or stepping.
pub(crate) fn execute_change(
    conn: &Connection,
    query: &str,
    bindings: &ParamBindings<'_>,
) -> Result<usize, SqlRequestError> {
    let mut stmt = prepare_bound(conn, query, bindings)?;
    let before = conn.total_changes();
    {
        let mut rows = stmt.raw_query();
        while rows.next()?.is_some() {}
    }
    // sqlite3_changes keeps the count of the last DML statement.
    if conn.total_changes() == before {
        return Ok(0);
    }
    usize::try_from(conn.changes())
        .map_err(|e| SqlRequestError::ExecutionError(format!("Invalid rows affected count: {e}")))
}

/// Run a statement and return the first column of its first row.
///
/// `None` when there is no row, no column, or the cell is NULL.
///
/// # Errors
/// Returns the driver error from preparing, binding or stepping.
pub(crate) fn execute_scalar(
    conn: &Connection,
    query: &str,
    bindings: &ParamBindings<'_>,
) -> Result<Option<RowValues>, SqlRequestError> {
    let mut stmt = prepare_bound(conn, query, bindings)?;
    let has_columns = stmt.column_count() > 0;
    let mut rows = stmt.raw_query();
    match rows.next()? {
        Some(row) if has_columns => match sqlite_extract_value(row, 0)? {
            RowValues::Null => Ok(None),
            value => Ok(Some(value)),
        },
        _ => Ok(None),
    }
}
