// src/check/json_path.rs
//! Key-path lookup and loose comparison over parsed JSON bodies.

use serde_json::{Number, Value};

/// Resolve a dot-delimited key path (`author.name.first`, `items[0].id`,
/// `items.0.id`) inside `root`.
///
/// A key that exists verbatim on the root object wins over the split path,
/// so documents with dotted keys stay reachable.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(value) = root.as_object().and_then(|map| map.get(path)) {
        return Some(value);
    }

    let mut current = root;
    for segment in segments(path) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(|c: char| c == '.' || c == '[' || c == ']')
        .filter(|segment| !segment.is_empty())
}

/// Loose equality between a value found in the body and the expected value.
///
/// Numbers and numeric strings compare numerically, booleans compare as
/// `1`/`0`, `null` only equals `null`, and arrays or objects compared with a
/// primitive are compared through their text form.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Bool(flag), other) | (other, Value::Bool(flag)) => {
            loose_eq(&Value::from(i64::from(*flag)), other)
        }
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match (to_number(s), n.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (
            Value::Array(_) | Value::Object(_),
            Value::Array(_) | Value::Object(_),
        ) => left == right,
        (composite @ (Value::Array(_) | Value::Object(_)), primitive)
        | (primitive, composite @ (Value::Array(_) | Value::Object(_))) => {
            loose_eq(&Value::String(value_text(composite)), primitive)
        }
    }
}

/// Text form of a value as it would be printed in a comparison.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
