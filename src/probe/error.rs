// src/probe/error.rs
use reqwest::StatusCode;
use std::time::Duration;

/// Every way a probe can end without a passing verdict.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("{0}")]
    VerdictMismatch(String),

    #[error("Body is empty.")]
    EmptyBody,

    #[error("Could not parse JSON body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProbeError {
    pub fn config(message: impl Into<String>) -> Self {
        ProbeError::Configuration(message.into())
    }

    /// Fast-fail error for a response in the error range.
    pub fn from_status(status: StatusCode) -> Self {
        let reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Status code {}", status.as_u16()));

        ProbeError::HttpStatus {
            status: status.as_u16(),
            reason,
        }
    }

    pub fn search_failed() -> Self {
        ProbeError::VerdictMismatch("Search failed.".to_string())
    }

    /// DNS, connection and timeout failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProbeError::Transport(_) | ProbeError::Timeout(_))
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        ProbeError::Transport(Box::new(err))
    }
}
