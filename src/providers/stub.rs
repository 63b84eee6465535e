//! Scriptable in-memory provider
//!
//! Used by tests and demos to drive the orchestrator without network access.

use super::error::FetchError;
use super::traits::SearchProvider;
use crate::results::Listing;
use crate::search::SearchContext;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

type ErrorFactory = Arc<dyn Fn() -> FetchError + Send + Sync>;

#[derive(Clone)]
enum Outcome {
    Listings(Vec<Listing>),
    Error(ErrorFactory),
}

/// Provider returning a fixed outcome and counting its calls
#[derive(Clone)]
pub struct StubProvider {
    name: String,
    configured: bool,
    outcome: Outcome,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    /// Configured provider returning `listings`
    pub fn with_listings(name: impl Into<String>, listings: Vec<Listing>) -> Self {
        Self {
            name: name.into(),
            configured: true,
            outcome: Outcome::Listings(listings),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configured provider returning no listings
    pub fn empty(name: impl Into<String>) -> Self {
        Self::with_listings(name, Vec::new())
    }

    /// Configured provider failing with a fresh error on every call
    pub fn failing<F>(name: impl Into<String>, error: F) -> Self
    where
        F: Fn() -> FetchError + Send + Sync + 'static,
    {
        Self {
            outcome: Outcome::Error(Arc::new(error)),
            ..Self::empty(name)
        }
    }

    /// Provider without credentials
    pub fn unconfigured(name: impl Into<String>) -> Self {
        Self {
            configured: false,
            ..Self::empty(name)
        }
    }

    /// Wait under the search context before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `search` was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn configured(&self) -> bool {
        self.configured
    }

    async fn search(&self, ctx: &SearchContext, _query: &str) -> Result<Vec<Listing>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            ctx.run(async {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .await?;
        } else if let Some(err) = ctx.err() {
            return Err(err);
        }

        match &self.outcome {
            Outcome::Listings(listings) => Ok(listings.clone()),
            Outcome::Error(factory) => Err(factory()),
        }
    }
}
