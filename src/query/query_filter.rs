use serde_json::{Map, Value};

use super::types::QueryPairs;

/// Flatten a filter object into query pairs.
///
/// Nested objects become dotted keys, arrays become repeated keys and `null`
/// values are left out. Keys keep the order they have in the filter.
pub fn flatten_filter(filter: &Map<String, Value>) -> QueryPairs {
    let mut pairs = QueryPairs::new();
    for (key, value) in filter {
        flatten_into(&mut pairs, key.clone(), value);
    }
    pairs
}

fn flatten_into(pairs: &mut QueryPairs, path: String, value: &Value) {
    match value {
        Value::Object(obj) => {
            for (key, nested) in obj {
                flatten_into(pairs, format!("{}.{}", path, key), nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                if let Some(text) = scalar_text(item) {
                    pairs.push(path.clone(), text);
                }
            }
        }
        other => {
            if let Some(text) = scalar_text(other) {
                pairs.push(path, text);
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Nested structures inside arrays have no flat form; send their JSON text
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_flat_filter_keeps_order() {
        let pairs = flatten_filter(&filter(json!({"status": "active", "age": 30, "staff": true})));
        let flat: Vec<_> = pairs.iter().collect();
        assert_eq!(flat, vec![("status", "active"), ("age", "30"), ("staff", "true")]);
    }

    #[test]
    fn test_nested_objects_use_dotted_keys() {
        let pairs = flatten_filter(&filter(json!({"author": {"name": "Ann", "meta": {"tier": 2}}})));
        assert_eq!(pairs.to_query_string(), "author.name=Ann&author.meta.tier=2");
    }

    #[test]
    fn test_arrays_repeat_the_key() {
        let pairs = flatten_filter(&filter(json!({"id": [1, 2, 3]})));
        assert_eq!(pairs.get_all("id"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_nulls_are_skipped() {
        let pairs = flatten_filter(&filter(json!({"q": null, "status": "active"})));
        assert_eq!(pairs.to_query_string(), "status=active");
    }

    #[test]
    fn test_empty_filter() {
        assert!(flatten_filter(&Map::new()).is_empty());
    }
}
