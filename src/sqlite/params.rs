use rusqlite::types::Value;
use rusqlite::Statement;

use crate::error::SqlRequestError;
use crate::request::bindings::ParamBindings;
use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Bind every parameter of `bindings` onto `stmt` by name.
///
/// Each bound name must appear in the statement and every statement parameter
/// must end up with a value; `SQLite` would otherwise bind NULL silently.
///
/// # Errors
/// Returns `SqlRequestError::ParameterError` for a name missing from the
/// statement or a statement parameter left unbound, and the driver error if
/// binding itself fails.
pub(crate) fn bind_params(
    stmt: &mut Statement<'_>,
    bindings: &ParamBindings<'_>,
) -> Result<(), SqlRequestError> {
    let mut bound = vec![false; stmt.parameter_count()];
    for binding in bindings.iter() {
        let token = binding.token();
        let idx = stmt.parameter_index(&token)?.ok_or_else(|| {
            SqlRequestError::ParameterError(format!(
                "parameter {token} does not appear in the statement"
            ))
        })?;
        stmt.raw_bind_parameter(idx, row_value_to_sqlite_value(binding.value))?;
        bound[idx - 1] = true;
    }

    if let Some(missing) = bound.iter().position(|is_bound| !is_bound) {
        let name = stmt.parameter_name(missing + 1).unwrap_or("?");
        return Err(SqlRequestError::ParameterError(format!(
            "statement parameter {name} has no bound value"
        )));
    }
    Ok(())
}
