//! Provider error types

use thiserror::Error;

/// Longest HTTP body kept in a status error
const MAX_BODY_SUMMARY: usize = 120;

/// A non-2xx response from a provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provider} status {status}: {body}")]
pub struct StatusError {
    pub provider: String,
    pub status: u16,
    /// Trimmed, truncated response body
    pub body: String,
}

impl StatusError {
    pub fn new(provider: impl Into<String>, status: u16, body: &str) -> Self {
        Self {
            provider: provider.into(),
            status,
            body: summarize_body(body),
        }
    }
}

/// Failure of a single provider call
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0} not set")]
    NotConfigured(String),

    #[error("search canceled")]
    Canceled,

    #[error("search deadline exceeded")]
    DeadlineExceeded,

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("request {provider}: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("decode {provider} response: {source}")]
    Decode {
        provider: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FetchError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Deadline expiry, including client-side request timeouts
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::DeadlineExceeded => true,
            Self::Transport { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(e) => Some(e.status),
            _ => None,
        }
    }
}

/// Shorten a response body for inclusion in an error message
pub fn summarize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    if trimmed.chars().count() > MAX_BODY_SUMMARY {
        let head: String = trimmed.chars().take(MAX_BODY_SUMMARY - 3).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}
