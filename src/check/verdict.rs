// src/check/verdict.rs
use super::json_path::{lookup, loose_eq, value_text};
use super::{CheckType, SearchTerm};
use crate::probe::ProbeError;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct HeaderExpectation {
    pub name: HeaderName,
    pub expected: String,
}

#[derive(Debug, Clone)]
pub enum JsonSearch {
    Equals { path: String, expected: Value },
    Exists(String),
}

/// A check type bound to its compiled search predicate.
#[derive(Debug, Clone)]
pub enum Check {
    Status(Option<f64>),
    Header(Option<HeaderExpectation>),
    Html(Option<Regex>),
    Json(Option<JsonSearch>),
}

impl Check {
    /// Bind `search` to `check_type`.
    ///
    /// A search whose shape does not fit the check type is dropped with a
    /// warning, or rejected when `strict` is set.
    pub fn compile(
        check_type: CheckType,
        search: Option<SearchTerm>,
        strict: bool,
    ) -> Result<Self, ProbeError> {
        let Some(term) = search else {
            return Ok(Check::empty(check_type));
        };

        if matches!(&term, SearchTerm::Text(text) if text.is_empty()) {
            return Ok(Check::empty(check_type));
        }

        let compiled = match check_type {
            CheckType::Status => term.as_number().map(|code| Check::Status(Some(code))),
            CheckType::Header => match &term {
                SearchTerm::Pair(name, expected) => Some(Check::Header(Some(HeaderExpectation {
                    name: header_name(name)?,
                    expected: value_text(expected),
                }))),
                _ => None,
            },
            CheckType::Html => match &term {
                SearchTerm::Pattern(pattern) => Some(Check::Html(Some(pattern.clone()))),
                SearchTerm::Text(source) => Some(Check::Html(Some(compile_pattern(source)?))),
                SearchTerm::Pair(key, value) if !strict => {
                    let source = format!("{},{}", key, value_text(value));
                    Some(Check::Html(Some(compile_pattern(&source)?)))
                }
                SearchTerm::Key(key) if !strict => Some(Check::Html(Some(compile_pattern(key)?))),
                _ => None,
            },
            CheckType::Json => match &term {
                SearchTerm::Pair(path, expected) => Some(Check::Json(Some(JsonSearch::Equals {
                    path: path.clone(),
                    expected: expected.clone(),
                }))),
                SearchTerm::Key(path) => Some(Check::Json(Some(JsonSearch::Exists(path.clone())))),
                _ => None,
            },
        };

        match compiled {
            Some(check) => Ok(check),
            None if strict => Err(ProbeError::config(format!(
                "search '{}' does not fit a {} check (expected {})",
                term,
                check_type,
                expected_shape(check_type)
            ))),
            None => {
                warn!(
                    "Ignoring search '{}' for {} check (expected {})",
                    term,
                    check_type,
                    expected_shape(check_type)
                );
                Ok(Check::empty(check_type))
            }
        }
    }

    fn empty(check_type: CheckType) -> Self {
        match check_type {
            CheckType::Status => Check::Status(None),
            CheckType::Header => Check::Header(None),
            CheckType::Html => Check::Html(None),
            CheckType::Json => Check::Json(None),
        }
    }

    pub fn check_type(&self) -> CheckType {
        match self {
            Check::Status(_) => CheckType::Status,
            Check::Header(_) => CheckType::Header,
            Check::Html(_) => CheckType::Html,
            Check::Json(_) => CheckType::Json,
        }
    }

    pub fn reads_body(&self) -> bool {
        matches!(self, Check::Html(_) | Check::Json(_))
    }

    pub fn verify_status(&self, status: StatusCode) -> Result<(), ProbeError> {
        match self {
            Check::Status(Some(expected)) if *expected != f64::from(status.as_u16()) => {
                Err(ProbeError::VerdictMismatch(format!(
                    "Expected status code {}, received {}",
                    expected,
                    status.as_u16()
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<(), ProbeError> {
        let Check::Header(Some(expectation)) = self else {
            return Ok(());
        };

        let values: Vec<&str> = headers
            .get_all(&expectation.name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();

        if !values.is_empty() && values.join(", ") == expectation.expected {
            return Ok(());
        }

        Err(ProbeError::VerdictMismatch(format!(
            "Could not find header property {} with value {}",
            expectation.name, expectation.expected
        )))
    }

    /// Body verdict for html and json checks; other checks pass.
    pub fn verify_body(&self, body: &str) -> Result<(), ProbeError> {
        if !self.reads_body() {
            return Ok(());
        }

        if body.is_empty() {
            return Err(ProbeError::EmptyBody);
        }

        match self {
            Check::Html(Some(pattern)) => {
                if pattern.is_match(body) {
                    Ok(())
                } else {
                    Err(ProbeError::search_failed())
                }
            }
            Check::Json(Some(search)) => {
                let document: Value = serde_json::from_str(body)?;
                let matched = match search {
                    // A missing path compares as `null`.
                    JsonSearch::Equals { path, expected } => {
                        loose_eq(lookup(&document, path).unwrap_or(&Value::Null), expected)
                    }
                    JsonSearch::Exists(path) => lookup(&document, path).is_some(),
                };

                if matched {
                    Ok(())
                } else {
                    Err(ProbeError::search_failed())
                }
            }
            _ => Ok(()),
        }
    }
}

fn header_name(name: &str) -> Result<HeaderName, ProbeError> {
    HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| ProbeError::config(format!("invalid header name '{}'", name)))
}

fn compile_pattern(source: &str) -> Result<Regex, ProbeError> {
    Regex::new(source)
        .map_err(|e| ProbeError::config(format!("invalid search pattern '{}': {}", source, e)))
}

fn expected_shape(check_type: CheckType) -> &'static str {
    match check_type {
        CheckType::Status => "a numeric status code",
        CheckType::Header => "name=value",
        CheckType::Html => "a string or regular expression",
        CheckType::Json => "key=value or [key]",
    }
}
