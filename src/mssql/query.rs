use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use futures_util::TryStreamExt;
use tracing::debug;

use super::client::MssqlClient;
use super::params::bind_query_params;
use crate::error::SqlRequestError;
use crate::request::bindings::ParamBindings;
use crate::results::{Columns, SqlRow};
use crate::types::RowValues;

/// Stream the rows of `query` into `handler`, in order.
pub(crate) async fn read_rows<F>(
    client: &mut MssqlClient,
    query: &str,
    bindings: &ParamBindings<'_>,
    mut handler: F,
) -> Result<(), SqlRequestError>
where
    F: FnMut(&SqlRow) -> Result<(), SqlRequestError>,
{
    debug!(params = bindings.len(), "mssql query: {query}");
    let mut stream = bind_query_params(query, bindings).query(client).await?;

    let names: Vec<String> = stream
        .columns()
        .await?
        .map(|cols| cols.iter().map(|col| col.name().to_string()).collect())
        .unwrap_or_default();
    let columns = Arc::new(Columns::new(names));

    let mut rows = stream.into_row_stream();
    while let Some(row) = rows.try_next().await? {
        let values = extract_row(&row)?;
        handler(&SqlRow::new(Arc::clone(&columns), values))?;
    }
    Ok(())
}

/// Execute `query` and return the rows affected, summed over all statements.
pub(crate) async fn execute_change(
    client: &mut MssqlClient,
    query: &str,
    bindings: &ParamBindings<'_>,
) -> Result<usize, SqlRequestError> {
    debug!(params = bindings.len(), "mssql execute: {query}");
    let exec_result = bind_query_params(query, bindings).execute(client).await?;

    let rows_affected: u64 = exec_result.rows_affected().iter().sum();
    usize::try_from(rows_affected).map_err(|e| {
        SqlRequestError::ExecutionError(format!("Invalid rows affected count: {e}"))
    })
}

/// First column of the first row, `None` for no row or a NULL cell.
pub(crate) async fn execute_scalar(
    client: &mut MssqlClient,
    query: &str,
    bindings: &ParamBindings<'_>,
) -> Result<Option<RowValues>, SqlRequestError> {
    debug!(params = bindings.len(), "mssql scalar: {query}");
    let row = bind_query_params(query, bindings)
        .query(client)
        .await?
        .into_row()
        .await?;

    match row {
        Some(row) if row.len() > 0 => match extract_value(&row, 0)? {
            RowValues::Null => Ok(None),
            value => Ok(Some(value)),
        },
        _ => Ok(None),
    }
}

fn extract_row(row: &tiberius::Row) -> Result<Vec<RowValues>, SqlRequestError> {
    (0..row.len()).map(|i| extract_value(row, i)).collect()
}

/// Extract a value from a row at a specific index
fn extract_value(row: &tiberius::Row, idx: usize) -> Result<RowValues, SqlRequestError> {
    if idx >= row.len() {
        return Err(SqlRequestError::ColumnIndexOutOfRange {
            index: idx,
            len: row.len(),
        });
    }

    // tiberius only converts to the exact column type, so try each in turn.
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return Ok(RowValues::Int(i64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return Ok(RowValues::Int(val));
    }
    if let Ok(Some(val)) = row.try_get::<i16, _>(idx) {
        return Ok(RowValues::Int(i64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<u8, _>(idx) {
        return Ok(RowValues::Int(i64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return Ok(RowValues::Float(f64::from(val)));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return Ok(RowValues::Float(val));
    }
    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return Ok(RowValues::Bool(val));
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return Ok(RowValues::Timestamp(val));
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDate, _>(idx) {
        if let Some(midnight) = val.and_hms_opt(0, 0, 0) {
            return Ok(RowValues::Timestamp(midnight));
        }
    }
    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return Ok(RowValues::Text(val.to_string()));
    }
    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return Ok(RowValues::Blob(val.to_vec()));
    }

    // NULL of any type, or a type with no RowValues counterpart.
    Ok(RowValues::Null)
}
