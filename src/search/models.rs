//! Search response and diagnostic models

use crate::providers::FetchError;
use crate::results::Listing;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// How search results were produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// At least one provider answered
    Live,
    /// No provider could be used
    #[default]
    Unavailable,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Live => "live",
            SearchMode::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classification of a failed provider call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    #[default]
    Unknown,
    Canceled,
    Timeout,
    Auth,
    RateLimit,
    Http,
    Transport,
}

impl ProviderErrorKind {
    /// Classify an adapter error. Cancellation and deadline expiry take
    /// precedence over any HTTP status.
    pub fn classify(error: &FetchError) -> Self {
        if error.is_canceled() {
            return Self::Canceled;
        }
        if error.is_timeout() {
            return Self::Timeout;
        }

        match error.status() {
            Some(401 | 403) => Self::Auth,
            Some(429) => Self::RateLimit,
            Some(_) => Self::Http,
            None => Self::Transport,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Canceled => "canceled",
            Self::Timeout => "timeout",
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::Http => "http",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A failed provider call with its classification
#[derive(Debug, Clone)]
pub struct ProviderError {
    pub provider: String,
    pub kind: ProviderErrorKind,
    pub error: Arc<FetchError>,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, error: FetchError) -> Self {
        Self {
            provider: provider.into(),
            kind: ProviderErrorKind::classify(&error),
            error: Arc::new(error),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.provider, self.kind, self.error)
    }
}

/// Response-level failure, set only when no provider could answer
#[derive(Debug, Clone)]
pub enum SearchFailure {
    /// No provider has credentials
    NoProviders,
    /// Every configured provider failed
    Unavailable {
        warning: String,
        cause: Option<Arc<FetchError>>,
    },
}

impl SearchFailure {
    /// Root cause of the failure, if a provider error is known
    pub fn cause(&self) -> Option<&FetchError> {
        match self {
            Self::NoProviders => None,
            Self::Unavailable { cause, .. } => cause.as_deref(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.cause().is_some_and(FetchError::is_canceled)
    }

    pub fn is_timeout(&self) -> bool {
        self.cause().is_some_and(FetchError::is_timeout)
    }
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProviders => f.write_str(
                "no live search providers configured; set BRAVE_API_KEY, TAVILY_API_KEY, or FIRECRAWL_API_KEY",
            ),
            Self::Unavailable {
                warning,
                cause: Some(cause),
            } if warning.is_empty() => write!(f, "{}", cause),
            Self::Unavailable {
                warning,
                cause: Some(cause),
            } => write!(f, "{}: {}", warning, cause),
            Self::Unavailable { warning, cause: None } if warning.is_empty() => {
                f.write_str("Live search unavailable.")
            }
            Self::Unavailable { warning, cause: None } => f.write_str(warning),
        }
    }
}

impl Error for SearchFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Search results plus per-provider diagnostics
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub results: Vec<Listing>,
    pub mode: SearchMode,
    /// Human-readable summary of provider failures; empty when none failed
    pub warning: String,
    pub error: Option<SearchFailure>,
    pub provider_errors: Vec<ProviderError>,
}

impl SearchResponse {
    pub fn is_live(&self) -> bool {
        self.mode == SearchMode::Live
    }
}
