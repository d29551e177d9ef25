use tiberius::Query;

use crate::request::bindings::ParamBindings;
use crate::translation::rewrite_named_placeholders;
use crate::types::RowValues;

/// Rewrite `@name` tokens to `@Pn` and bind the values in bind-list order.
pub(crate) fn bind_query_params<'a>(query: &'a str, bindings: &ParamBindings<'_>) -> Query<'a> {
    let sql = rewrite_named_placeholders(query, &bindings.names());
    let mut query_builder = Query::new(sql);

    for binding in bindings.iter() {
        match binding.value {
            RowValues::Int(i) => query_builder.bind(*i),
            RowValues::Float(f) => query_builder.bind(*f),
            RowValues::Text(s) => query_builder.bind(s.clone()),
            RowValues::Bool(b) => query_builder.bind(*b),
            RowValues::Timestamp(dt) => query_builder.bind(*dt),
            RowValues::Null => query_builder.bind(Option::<String>::None),
            RowValues::JSON(jsval) => query_builder.bind(jsval.to_string()),
            RowValues::Blob(bytes) => query_builder.bind(bytes.clone()),
        }
    }

    query_builder
}
