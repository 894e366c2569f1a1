// src/config/models.rs
use crate::check::{Check, CheckType, SearchTerm};
use crate::probe::ProbeError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Method;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_TIMEOUT_MS: u64 = 800;
pub const DEFAULT_CHECK_TYPE: CheckType = CheckType::Status;

/// Identifies the probe to the target; always overrides a caller value.
pub const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Caller input for one probe. Unset fields fall back to the defaults above
/// when the config is validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub url: Option<String>,
    pub method: Option<String>,
    #[serde(alias = "timeout")]
    pub timeout_ms: Option<u64>,
    #[serde(rename = "type", alias = "check_type")]
    pub check_type: Option<CheckType>,
    pub search: Option<SearchTerm>,
    pub headers: BTreeMap<String, String>,
    pub verbose: bool,
    /// Reject search predicates that do not fit the check type instead of
    /// ignoring them.
    pub strict: bool,
}

impl ProbeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_check_type(mut self, check_type: CheckType) -> Self {
        self.check_type = Some(check_type);
        self
    }

    pub fn with_search(mut self, search: impl Into<SearchTerm>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(mut self, overrides: ProbeConfig) -> Self {
        if overrides.url.is_some() {
            self.url = overrides.url;
        }
        if overrides.method.is_some() {
            self.method = overrides.method;
        }
        if overrides.timeout_ms.is_some() {
            self.timeout_ms = overrides.timeout_ms;
        }
        if overrides.check_type.is_some() {
            self.check_type = overrides.check_type;
        }
        if overrides.search.is_some() {
            self.search = overrides.search;
        }
        self.headers.extend(overrides.headers);
        self.verbose |= overrides.verbose;
        self.strict |= overrides.strict;
        self
    }

    /// Apply defaults and check everything that can be checked before any
    /// network I/O, producing the immutable [`Probe`].
    pub fn validate(self) -> Result<Probe, ProbeError> {
        let raw_url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ProbeError::config("a target URL is required"))?;

        let url = Url::parse(raw_url)
            .map_err(|e| ProbeError::config(format!("invalid URL '{}': {}", raw_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProbeError::config(format!(
                "unsupported scheme '{}', expected http or https",
                url.scheme()
            )));
        }

        let method_name = self
            .method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_METHOD)
            .to_ascii_uppercase();
        let method = Method::from_bytes(method_name.as_bytes())
            .map_err(|_| ProbeError::config(format!("invalid HTTP method '{}'", method_name)))?;

        let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ProbeError::config("timeout must be greater than zero"));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|_| ProbeError::config(format!("invalid header name '{}'", name)))?;
            let header_value = HeaderValue::from_str(value.trim()).map_err(|_| {
                ProbeError::config(format!("invalid value for header '{}'", name))
            })?;
            headers.insert(header_name, header_value);
        }
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let check_type = self.check_type.unwrap_or(DEFAULT_CHECK_TYPE);
        let check = Check::compile(check_type, self.search, self.strict)?;

        Ok(Probe {
            url,
            method,
            timeout: Duration::from_millis(timeout_ms),
            headers,
            check,
            verbose: self.verbose,
        })
    }
}

/// A validated probe, ready to be sent. Never mutated once built.
#[derive(Debug, Clone)]
pub struct Probe {
    pub url: Url,
    pub method: Method,
    pub timeout: Duration,
    pub headers: HeaderMap,
    pub check: Check,
    pub verbose: bool,
}

impl Probe {
    pub fn check_type(&self) -> CheckType {
        self.check.check_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let probe = ProbeConfig::new("http://example.com").validate().unwrap();

        assert_eq!(probe.method, Method::GET);
        assert_eq!(probe.timeout, Duration::from_millis(800));
        assert_eq!(probe.check_type(), CheckType::Status);
        assert!(matches!(probe.check, Check::Status(None)));
        assert!(!probe.verbose);
        assert_eq!(probe.url.as_str(), "http://example.com/");
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let err = ProbeConfig::default().validate().unwrap_err();
        assert!(matches!(err, ProbeError::Configuration(_)));

        let err = ProbeConfig::new("   ").validate().unwrap_err();
        assert!(matches!(err, ProbeError::Configuration(_)));
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let err = ProbeConfig::new("localhost").validate().unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }

    #[test]
    fn test_unsupported_scheme_is_rejected() {
        let err = ProbeConfig::new("ftp://example.com/file").validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_method_is_normalised() {
        let probe = ProbeConfig::new("https://example.com")
            .with_method("head")
            .validate()
            .unwrap();
        assert_eq!(probe.method, Method::HEAD);

        let err = ProbeConfig::new("https://example.com")
            .with_method("GE T")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ProbeError::Configuration(_)));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = ProbeConfig::new("http://example.com")
            .with_timeout_ms(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ProbeError::Configuration(_)));
    }

    #[test]
    fn test_user_agent_overrides_caller_value() {
        let probe = ProbeConfig::new("http://example.com")
            .with_header("User-Agent", "curl/8.0")
            .with_header("Accept", "application/json")
            .validate()
            .unwrap();

        assert_eq!(probe.headers[USER_AGENT], USER_AGENT_VALUE);
        assert_eq!(probe.headers.get_all(USER_AGENT).iter().count(), 1);
        assert_eq!(probe.headers["accept"], "application/json");
        assert!(USER_AGENT_VALUE.starts_with("healthcheck/"));
    }

    #[test]
    fn test_invalid_outgoing_header_is_rejected() {
        let err = ProbeConfig::new("http://example.com")
            .with_header("bad header", "x")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("invalid header name"));
    }

    #[test]
    fn test_search_is_bound_to_check_type() {
        let probe = ProbeConfig::new("http://example.com")
            .with_check_type(CheckType::Json)
            .with_search(SearchTerm::pair("apple", "red"))
            .validate()
            .unwrap();
        assert!(matches!(probe.check, Check::Json(Some(_))));

        let err = ProbeConfig::new("http://example.com")
            .with_check_type(CheckType::Status)
            .with_search("green")
            .strict(true)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ProbeError::Configuration(_)));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = ProbeConfig::new("http://base.test")
            .with_method("POST")
            .with_timeout_ms(2000)
            .with_header("Accept", "text/html");
        let overrides = ProbeConfig {
            timeout_ms: Some(500),
            check_type: Some(CheckType::Html),
            headers: BTreeMap::from([("X-Probe".to_string(), "1".to_string())]),
            verbose: true,
            ..ProbeConfig::default()
        };

        let merged = base.merge(overrides);
        assert_eq!(merged.url.as_deref(), Some("http://base.test"));
        assert_eq!(merged.method.as_deref(), Some("POST"));
        assert_eq!(merged.timeout_ms, Some(500));
        assert_eq!(merged.check_type, Some(CheckType::Html));
        assert_eq!(merged.headers.len(), 2);
        assert!(merged.verbose);
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = r#"
url: http://echo.jsontest.com/apple/red
type: json
search: [apple, red]
timeout: 1500
headers:
  Accept: application/json
"#;
        let config: ProbeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.check_type, Some(CheckType::Json));
        assert_eq!(config.timeout_ms, Some(1500));

        let probe = config.validate().unwrap();
        assert!(matches!(probe.check, Check::Json(Some(_))));
        assert_eq!(probe.headers["accept"], "application/json");
    }

    #[test]
    fn test_deserialize_json() {
        let json = r#"{"url": "https://example.com", "type": "status", "search": 200, "strict": true}"#;
        let config: ProbeConfig = serde_json::from_str(json).unwrap();
        let probe = config.validate().unwrap();
        assert!(matches!(probe.check, Check::Status(Some(code)) if code == 200.0));
    }
}
