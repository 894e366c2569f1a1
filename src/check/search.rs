// src/check/search.rs
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Caller-supplied search predicate, before it is bound to a check type.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Value")]
pub enum SearchTerm {
    /// Plain text: a numeric status, or a pattern source for body checks.
    Text(String),
    Number(f64),
    /// `[key, expected]` for header and JSON checks.
    Pair(String, Value),
    /// One-element `[key]` form.
    Key(String),
    /// Pre-compiled body pattern.
    Pattern(Regex),
}

impl SearchTerm {
    /// Interpret a raw command line value.
    ///
    /// A value containing `=` is split on the first `=` into a key/value
    /// pair (`content-type=text/html; charset=UTF-8`); anything else is
    /// kept as text.
    pub fn from_arg(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((key, value)) => SearchTerm::Pair(key.to_string(), Value::String(value.to_string())),
            None => SearchTerm::Text(raw.to_string()),
        }
    }

    pub fn pair(key: impl Into<String>, expected: impl Into<Value>) -> Self {
        SearchTerm::Pair(key.into(), expected.into())
    }

    /// Numeric reading used by status checks.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SearchTerm::Number(n) if n.is_finite() => Some(*n),
            SearchTerm::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }
}

impl From<&str> for SearchTerm {
    fn from(text: &str) -> Self {
        SearchTerm::Text(text.to_string())
    }
}

impl From<String> for SearchTerm {
    fn from(text: String) -> Self {
        SearchTerm::Text(text)
    }
}

impl From<u16> for SearchTerm {
    fn from(status: u16) -> Self {
        SearchTerm::Number(f64::from(status))
    }
}

impl From<Regex> for SearchTerm {
    fn from(pattern: Regex) -> Self {
        SearchTerm::Pattern(pattern)
    }
}

impl TryFrom<Value> for SearchTerm {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(SearchTerm::Text(text)),
            Value::Number(n) => n
                .as_f64()
                .map(SearchTerm::Number)
                .ok_or_else(|| format!("search number {} is out of range", n)),
            Value::Array(mut items) => match items.len() {
                1 => match items.pop() {
                    Some(Value::String(key)) => Ok(SearchTerm::Key(key)),
                    _ => Err("search key must be a string".to_string()),
                },
                2 => {
                    let expected = items.pop().unwrap_or(Value::Null);
                    match items.pop() {
                        Some(Value::String(key)) => Ok(SearchTerm::Pair(key, expected)),
                        _ => Err("search key must be a string".to_string()),
                    }
                }
                n => Err(format!("search must have one or two elements, got {}", n)),
            },
            other => Err(format!("unsupported search value: {}", other)),
        }
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTerm::Text(text) => write!(f, "{}", text),
            SearchTerm::Number(n) => write!(f, "{}", n),
            SearchTerm::Pair(key, expected) => {
                write!(f, "{}={}", key, super::json_path::value_text(expected))
            }
            SearchTerm::Key(key) => write!(f, "{}", key),
            SearchTerm::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}
