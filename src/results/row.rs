use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::SqlRequestError;
use crate::types::RowValues;

/// Column names of a result, shared by every row of that result.
#[derive(Debug, Default)]
pub struct Columns {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Columns {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        // First occurrence wins for duplicated column names.
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self { names, index }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One row handed to a `read_rows` handler.
///
/// Values are decoded once when the row is fetched. The typed getters address
/// columns by ordinal and fail with [`SqlRequestError::ColumnIndexOutOfRange`]
/// or [`SqlRequestError::TypeMismatch`].
#[derive(Debug, Clone)]
pub struct SqlRow {
    columns: Arc<Columns>,
    values: Vec<RowValues>,
}

impl SqlRow {
    #[must_use]
    pub fn new(columns: Arc<Columns>, values: Vec<RowValues>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.names()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by column name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.columns
            .position(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Like [`get_by_index`](Self::get_by_index) but out-of-range is an error.
    ///
    /// # Errors
    /// Returns `ColumnIndexOutOfRange` when `index` is past the last column.
    pub fn value(&self, index: usize) -> Result<&RowValues, SqlRequestError> {
        self.values
            .get(index)
            .ok_or(SqlRequestError::ColumnIndexOutOfRange {
                index,
                len: self.values.len(),
            })
    }

    /// # Errors
    /// Returns `ColumnIndexOutOfRange` when `index` is past the last column.
    pub fn is_null(&self, index: usize) -> Result<bool, SqlRequestError> {
        Ok(self.value(index)?.is_null())
    }

    /// # Errors
    /// Fails on a bad ordinal or a non-integer column.
    pub fn get_int(&self, index: usize) -> Result<i64, SqlRequestError> {
        self.typed(index, "integer", |v| v.as_int().copied())
    }

    /// # Errors
    /// Fails on a bad ordinal or a non-numeric column.
    pub fn get_float(&self, index: usize) -> Result<f64, SqlRequestError> {
        self.typed(index, "float", RowValues::as_float)
    }

    /// # Errors
    /// Fails on a bad ordinal or a non-text column.
    pub fn get_text(&self, index: usize) -> Result<&str, SqlRequestError> {
        let value = self.value(index)?;
        value.as_text().ok_or(SqlRequestError::TypeMismatch {
            index,
            expected: "text",
            found: value.type_name(),
        })
    }

    /// # Errors
    /// Fails on a bad ordinal or a column that is neither boolean nor 0/1.
    pub fn get_bool(&self, index: usize) -> Result<bool, SqlRequestError> {
        self.typed(index, "boolean", |v| v.as_bool().copied())
    }

    /// # Errors
    /// Fails on a bad ordinal or a column that does not hold a date/time.
    pub fn get_timestamp(&self, index: usize) -> Result<NaiveDateTime, SqlRequestError> {
        self.typed(index, "timestamp", RowValues::as_timestamp)
    }

    /// # Errors
    /// Fails on a bad ordinal or a non-binary column.
    pub fn get_blob(&self, index: usize) -> Result<&[u8], SqlRequestError> {
        let value = self.value(index)?;
        value.as_blob().ok_or(SqlRequestError::TypeMismatch {
            index,
            expected: "blob",
            found: value.type_name(),
        })
    }

    fn typed<T>(
        &self,
        index: usize,
        expected: &'static str,
        convert: impl FnOnce(&RowValues) -> Option<T>,
    ) -> Result<T, SqlRequestError> {
        let value = self.value(index)?;
        convert(value).ok_or(SqlRequestError::TypeMismatch {
            index,
            expected,
            found: value.type_name(),
        })
    }
}
