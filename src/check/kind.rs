// src/check/kind.rs
use crate::probe::ProbeError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which part of the response forms the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    #[default]
    Status,
    #[serde(alias = "headers")]
    Header,
    Html,
    Json,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Status => "status",
            CheckType::Header => "header",
            CheckType::Html => "html",
            CheckType::Json => "json",
        }
    }
}

impl FromStr for CheckType {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(CheckType::Status),
            "header" | "headers" => Ok(CheckType::Header),
            "html" => Ok(CheckType::Html),
            "json" => Ok(CheckType::Json),
            other => Err(ProbeError::config(format!(
                "unknown check type '{}', expected one of status, header, html, json",
                other
            ))),
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_types() {
        assert_eq!("status".parse::<CheckType>().unwrap(), CheckType::Status);
        assert_eq!("HEADER".parse::<CheckType>().unwrap(), CheckType::Header);
        assert_eq!("headers".parse::<CheckType>().unwrap(), CheckType::Header);
        assert_eq!(" html ".parse::<CheckType>().unwrap(), CheckType::Html);
        assert_eq!("json".parse::<CheckType>().unwrap(), CheckType::Json);
    }

    #[test]
    fn test_unknown_check_type_is_rejected() {
        let err = "xml".parse::<CheckType>().unwrap_err();
        assert!(matches!(err, ProbeError::Configuration(_)));
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_default_is_status() {
        assert_eq!(CheckType::default(), CheckType::Status);
        assert_eq!(CheckType::default().to_string(), "status");
    }
}
