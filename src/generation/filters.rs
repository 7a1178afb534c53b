//! Named text-transform functions exposed to component templates

use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::generation::utils::{
    to_camel_case, to_kebab_case, to_pascal_case, to_screaming_snake_case, to_snake_case,
};

/// A template filter, in the shape tera calls it
pub type FilterFn = Arc<
    dyn Fn(&JsonValue, &HashMap<String, JsonValue>) -> tera::Result<JsonValue> + Send + Sync,
>;

/// Filter name to implementation
pub type FilterTable = BTreeMap<String, FilterFn>;

/// Abstract type tag to target-language type name
pub type TypeTable = &'static [(&'static str, &'static str)];

/// Text view of a scalar filter input. Arrays and objects are rejected.
fn scalar_text(value: &JsonValue, filter: &str) -> tera::Result<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Null => Ok(String::new()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Number(n) => Ok(n.to_string()),
        _ => Err(tera::Error::msg(format!(
            "Filter `{filter}` expects a string, got {value}"
        ))),
    }
}

/// Wrap a plain string transform as a filter
pub fn string_filter(name: &'static str, transform: fn(&str) -> String) -> FilterFn {
    Arc::new(move |value: &JsonValue, _args: &HashMap<String, JsonValue>| {
        let text = scalar_text(value, name)?;
        Ok(JsonValue::String(transform(&text)))
    })
}

/// Look up a type tag in `table`; unknown or non-string input yields `fallback`
pub fn map_type(table: TypeTable, fallback: &'static str, tag: &JsonValue) -> &'static str {
    let Some(tag) = tag.as_str() else {
        return fallback;
    };
    let tag = tag.trim().to_lowercase();
    table
        .iter()
        .find(|(abstract_type, _)| *abstract_type == tag)
        .map(|(_, concrete)| *concrete)
        .unwrap_or(fallback)
}

/// Type-mapping filter that never fails
pub fn type_filter(table: TypeTable, fallback: &'static str) -> FilterFn {
    Arc::new(move |value: &JsonValue, _args: &HashMap<String, JsonValue>| {
        Ok(JsonValue::String(map_type(table, fallback, value).to_string()))
    })
}

/// Case converters every language gets
pub fn shared_filters() -> FilterTable {
    let mut filters = FilterTable::new();
    filters.insert("snake_case".into(), string_filter("snake_case", to_snake_case));
    filters.insert("camel_case".into(), string_filter("camel_case", to_camel_case));
    filters.insert("pascal_case".into(), string_filter("pascal_case", to_pascal_case));
    filters.insert(
        "screaming_snake_case".into(),
        string_filter("screaming_snake_case", to_screaming_snake_case),
    );
    filters.insert("kebab_case".into(), string_filter("kebab_case", to_kebab_case));
    filters
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TABLE: TypeTable = &[("integer", "i64"), ("boolean", "bool")];

    fn call(filter: &FilterFn, value: JsonValue) -> tera::Result<JsonValue> {
        filter(&value, &HashMap::new())
    }

    #[test]
    fn test_shared_filters_present() {
        let filters = shared_filters();
        for name in [
            "snake_case",
            "camel_case",
            "pascal_case",
            "screaming_snake_case",
            "kebab_case",
        ] {
            assert!(filters.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn test_string_filter_applies_transform() {
        let filters = shared_filters();
        let result = call(&filters["pascal_case"], json!("deploy-all")).unwrap();
        assert_eq!(result, json!("DeployAll"));
        let empty = call(&filters["snake_case"], json!("")).unwrap();
        assert_eq!(empty, json!(""));
    }

    #[test]
    fn test_string_filter_rejects_collections() {
        let filters = shared_filters();
        assert!(call(&filters["snake_case"], json!(["a"])).is_err());
    }

    #[test]
    fn test_type_filter_falls_back() {
        let filter = type_filter(TABLE, "String");
        assert_eq!(call(&filter, json!("Integer")).unwrap(), json!("i64"));
        assert_eq!(call(&filter, json!("uuid")).unwrap(), json!("String"));
        assert_eq!(call(&filter, json!(42)).unwrap(), json!("String"));
        assert_eq!(call(&filter, JsonValue::Null).unwrap(), json!("String"));
    }
}
