//! Loose accessors over raw `serde_json::Value` records.
//!
//! Legacy records are untyped. Every accessor here is total: a missing key, a
//! `null` intermediate, or a non-object parent all resolve to `None` instead of
//! failing.

use serde_json::{Number, Value};

/// Truthiness as the historical records were written against it:
/// `null`, `false`, `0` and `""` are falsy; everything else, including empty
/// arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Looks up the first key that is present and non-null, in alias order.
pub fn lookup<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let obj = record.as_object()?;
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Reads a string field. Numbers are rendered as text so no digits are lost;
/// any other type, or an empty string, yields `None`.
pub fn lookup_string(record: &Value, keys: &[&str]) -> Option<String> {
    match lookup(record, keys)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn string_or_empty(record: &Value, keys: &[&str]) -> String {
    lookup_string(record, keys).unwrap_or_default()
}

pub fn lookup_number(record: &Value, keys: &[&str]) -> Option<Number> {
    match lookup(record, keys)? {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

pub fn lookup_array<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    lookup(record, keys)?.as_array()
}

/// Keeps the string elements of an array in order.
pub fn string_elements(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect()
}
