use crate::types::RowValues;

/// One named query parameter.
///
/// `name` is written without the `@` prefix: `Placeholder::new("id", 7)` binds
/// to `@id` in the query text. SQL Server matches the name regardless of
/// ASCII case; `SQLite` requires the exact spelling. Nothing is validated
/// here; the request checks names when it binds them.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    name: String,
    value: RowValues,
}

impl Placeholder {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &RowValues {
        &self.value
    }
}

impl<N: Into<String>, V: Into<RowValues>> From<(N, V)> for Placeholder {
    fn from((name, value): (N, V)) -> Self {
        Placeholder::new(name, value)
    }
}
