//! Presence checks, string coercion and source merging

use serde_json::{Map, Value};

/// `false` for null and the empty string, `true` for everything else
/// (including `0`, `false` and empty collections)
pub fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Render any value as a string the way a form field would see it
pub fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            // Whole floats print without a fractional part
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(coerce).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Recursively merge `source` into `target`.
///
/// Nested objects merge key by key; any other value overwrites.
pub fn merge(target: &mut Value, source: &Value) {
    let Value::Object(source_map) = source else {
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(target_map) = target else {
        return;
    };

    for (key, incoming) in source_map {
        let both_objects = incoming.is_object()
            && target_map.get(key).map_or(false, Value::is_object);

        if both_objects {
            if let Some(existing) = target_map.get_mut(key) {
                merge(existing, incoming);
            }
        } else {
            target_map.insert(key.clone(), incoming.clone());
        }
    }
}

/// Merge several sources, in order, into a fresh object
pub fn merge_sources<'a, I>(sources: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut merged = Value::Object(Map::new());
    for source in sources {
        merge(&mut merged, source);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_value() {
        assert!(!has_value(&Value::Null));
        assert!(!has_value(&json!("")));
        assert!(has_value(&json!(" ")));
        assert!(has_value(&json!(0)));
        assert!(has_value(&json!(false)));
        assert!(has_value(&json!([])));
        assert!(has_value(&json!({})));
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(&Value::Null), "");
        assert_eq!(coerce(&json!("text")), "text");
        assert_eq!(coerce(&json!(42)), "42");
        assert_eq!(coerce(&json!(1.5)), "1.5");
        assert_eq!(coerce(&json!(2.0)), "2");
        assert_eq!(coerce(&json!(true)), "true");
        assert_eq!(coerce(&json!([1, "a", null])), "1,a,");
        assert_eq!(coerce(&json!({ "k": 1 })), r#"{"k":1}"#);
    }

    #[test]
    fn test_merge_is_recursive_for_objects() {
        let mut target = json!({ "user": { "name": "dan", "age": 30 }, "keep": 1 });
        merge(
            &mut target,
            &json!({ "user": { "age": 31, "email": "d@x.io" }, "extra": true }),
        );

        assert_eq!(
            target,
            json!({
                "user": { "name": "dan", "age": 31, "email": "d@x.io" },
                "keep": 1,
                "extra": true
            })
        );
    }

    #[test]
    fn test_merge_last_write_wins_for_non_objects() {
        let mut target = json!({ "tags": ["a"], "name": { "first": "x" } });
        merge(&mut target, &json!({ "tags": ["b"], "name": "flat" }));
        assert_eq!(target, json!({ "tags": ["b"], "name": "flat" }));
    }

    #[test]
    fn test_merge_sources_in_order() {
        let body = json!({ "a": 1, "b": 1 });
        let query = json!({ "b": 2 });
        let params = Value::Null;

        let merged = merge_sources([&body, &query, &params]);
        assert_eq!(merged, json!({ "a": 1, "b": 2 }));
    }
}
