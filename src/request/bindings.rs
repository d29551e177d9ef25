use std::borrow::Cow;
use std::collections::HashSet;

use crate::error::SqlRequestError;
use crate::placeholder::Placeholder;
use crate::types::RowValues;

/// Prefix of a bind parameter in query text (`@0`, `@id`).
pub const BIND_PREFIX: char = '@';

/// A value paired with the parameter name it binds to.
#[derive(Debug)]
pub(crate) struct Binding<'a> {
    pub(crate) name: Cow<'a, str>,
    pub(crate) value: &'a RowValues,
}

impl Binding<'_> {
    /// The parameter as it appears in query text.
    pub(crate) fn token(&self) -> String {
        format!("{BIND_PREFIX}{}", self.name)
    }
}

/// Ordered bind list for one call. Declaration order is kept as is.
#[derive(Debug)]
pub(crate) struct ParamBindings<'a>(Vec<Binding<'a>>);

impl<'a> ParamBindings<'a> {
    /// Positional arguments bind to `@0`, `@1`, ...
    pub(crate) fn positional(args: &'a [RowValues]) -> Self {
        Self(
            args.iter()
                .enumerate()
                .map(|(i, value)| Binding {
                    name: Cow::Owned(i.to_string()),
                    value,
                })
                .collect(),
        )
    }

    /// Named arguments bind to `@<name>`.
    ///
    /// # Errors
    /// `ParameterError` for an empty name, a name carrying the `@` prefix, or a
    /// name used twice in the same call.
    pub(crate) fn named(args: &'a [Placeholder]) -> Result<Self, SqlRequestError> {
        let mut seen = HashSet::with_capacity(args.len());
        let mut bindings = Vec::with_capacity(args.len());
        for placeholder in args {
            let name = placeholder.name();
            if name.is_empty() {
                return Err(SqlRequestError::ParameterError(
                    "placeholder name must not be empty".into(),
                ));
            }
            if name.contains(BIND_PREFIX) {
                return Err(SqlRequestError::ParameterError(format!(
                    "placeholder name '{name}' must be given without the '{BIND_PREFIX}' prefix"
                )));
            }
            if !seen.insert(name) {
                return Err(SqlRequestError::ParameterError(format!(
                    "placeholder '{name}' is bound more than once"
                )));
            }
            bindings.push(Binding {
                name: Cow::Borrowed(name),
                value: placeholder.value(),
            });
        }
        Ok(Self(bindings))
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Binding<'a>> {
        self.0.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(feature = "mssql")]
    pub(crate) fn names(&self) -> Vec<&str> {
        self.0.iter().map(|b| b.name.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_names_follow_index() {
        let args = [
            RowValues::Int(1),
            RowValues::Text("x".into()),
            RowValues::Null,
        ];
        let bindings = ParamBindings::positional(&args);
        let names: Vec<&str> = bindings.iter().map(|b| b.name.as_ref()).collect();
        assert_eq!(names, vec!["0", "1", "2"]);
        let tokens: Vec<String> = bindings.iter().map(Binding::token).collect();
        assert_eq!(tokens, vec!["@0", "@1", "@2"]);
        assert_eq!(bindings.iter().nth(1).map(|b| b.value), Some(&args[1]));
    }

    #[test]
    fn named_keeps_declaration_order() -> Result<(), SqlRequestError> {
        let args = [
            Placeholder::new("nom", "Lavie"),
            Placeholder::new("ins", RowValues::Null),
            Placeholder::new("pre", "Youpi"),
        ];
        let bindings = ParamBindings::named(&args)?;
        let names: Vec<&str> = bindings.iter().map(|b| b.name.as_ref()).collect();
        assert_eq!(names, vec!["nom", "ins", "pre"]);
        assert_eq!(bindings.len(), 3);
        Ok(())
    }

    #[cfg(feature = "mssql")]
    #[test]
    fn names_follow_bind_order() -> Result<(), SqlRequestError> {
        let args = [Placeholder::new("b", 1), Placeholder::new("a", 2)];
        assert_eq!(ParamBindings::named(&args)?.names(), vec!["b", "a"]);
        Ok(())
    }

    #[test]
    fn named_rejects_bad_names() {
        for args in [
            vec![Placeholder::new("", 1)],
            vec![Placeholder::new("@id", 1)],
            vec![Placeholder::new("id", 1), Placeholder::new("id", 2)],
        ] {
            assert!(matches!(
                ParamBindings::named(&args),
                Err(SqlRequestError::ParameterError(_))
            ));
        }
    }
}
