//! Dot and bracket property addressing over JSON objects
//!
//! `user.address.city` and `user[address][city]` name the same slot.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static BRACKET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());

/// Rewrite bracket segments as dot segments: `a[b][c]` becomes `a.b.c`
pub fn to_dot_notation(path: &str) -> String {
    BRACKET_REGEX.replace_all(path, ".${1}").into_owned()
}

fn segments(path: &str) -> Vec<String> {
    to_dot_notation(path)
        .split('.')
        .take_while(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a possibly nested property.
///
/// Any missing or null step along the way yields the empty string rather
/// than an error. Arrays are indexed by numeric segments.
pub fn get_prop(path: &str, obj: &Value) -> Value {
    let mut current = obj;

    for segment in segments(path) {
        let next = match current {
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        };

        match next {
            None | Some(Value::Null) => return Value::String(String::new()),
            Some(value) => current = value,
        }
    }

    current.clone()
}

/// Write a possibly nested property, creating intermediate objects.
///
/// Intermediates that are not objects (or in-bounds array slots) are
/// replaced by empty objects, including a non-object root.
pub fn set_prop(path: &str, obj: &mut Value, value: Value) {
    let segments = segments(path);
    if segments.is_empty() {
        return;
    }

    let mut slot = obj;
    for segment in &segments {
        slot = child_slot(slot, segment);
    }
    *slot = value;
}

fn child_slot<'a>(parent: &'a mut Value, segment: &str) -> &'a mut Value {
    let array_index = match &*parent {
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .filter(|index| *index < items.len()),
        _ => None,
    };
    if let Some(index) = array_index {
        return &mut parent[index];
    }

    if !parent.is_object() {
        *parent = Value::Object(Map::new());
    }
    &mut parent[segment]
}
