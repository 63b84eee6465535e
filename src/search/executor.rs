//! Search execution and orchestration

use super::context::SearchContext;
use super::models::{ProviderError, ProviderErrorKind, SearchFailure, SearchMode, SearchResponse};
use crate::metrics::Metrics;
use crate::providers::{key_var, FetchError, SearchProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Searches providers one at a time, in priority order, until one returns
/// listings
pub struct PriceSearch {
    providers: Vec<Arc<dyn SearchProvider>>,
    metrics: Arc<Metrics>,
}

impl PriceSearch {
    /// Create a search orchestrator over `providers`, highest priority first
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        Self {
            providers,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Record provider outcomes into shared metrics
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn providers(&self) -> &[Arc<dyn SearchProvider>] {
        &self.providers
    }

    /// Whether at least one provider has usable credentials
    pub fn has_configured_provider(&self) -> bool {
        self.providers.iter().any(|p| p.configured())
    }

    /// Search with a context that is never canceled
    pub async fn search_prices(&self, query: &str) -> SearchResponse {
        self.search_prices_context(&SearchContext::new(), query)
            .await
    }

    /// Search for listings, honoring `ctx` for cancellation and deadline
    pub async fn search_prices_context(&self, ctx: &SearchContext, query: &str) -> SearchResponse {
        let query = query.trim();
        self.metrics.inc_search();

        if !self.has_configured_provider() {
            warn!("No live search providers configured");
            return SearchResponse {
                mode: SearchMode::Unavailable,
                error: Some(SearchFailure::NoProviders),
                ..Default::default()
            };
        }

        let mut successful = 0usize;
        let mut provider_errors = Vec::new();
        let mut failed = Vec::new();
        let mut hints = Vec::new();

        for provider in self.providers.iter().filter(|p| p.configured()) {
            let name = display_name(provider.as_ref());
            let start = Instant::now();

            self.metrics.record_provider_call(&name);
            let result = provider.search(ctx, query).await;
            let elapsed = start.elapsed();
            self.metrics.record_response_time(
                &name,
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            );

            match result {
                Err(error) => {
                    let provider_error = ProviderError::new(name.clone(), error);
                    warn!(
                        "Provider {} failed ({}): {}",
                        name, provider_error.kind, provider_error.error
                    );
                    self.metrics
                        .record_error(&name, provider_error.kind.as_str());

                    if let Some(hint) = actionable_hint(&name, &provider_error.error) {
                        hints.push(hint);
                    }
                    failed.push(name);
                    provider_errors.push(provider_error);
                }
                Ok(results) => {
                    successful += 1;
                    self.metrics.record_success(&name, results.is_empty());
                    debug!(
                        "Provider {} returned {} listings in {:?}",
                        name,
                        results.len(),
                        elapsed
                    );

                    if !results.is_empty() {
                        info!("Search '{}' answered by {}", query, name);
                        return SearchResponse {
                            results,
                            mode: SearchMode::Live,
                            warning: build_warning(&failed, &hints),
                            error: None,
                            provider_errors,
                        };
                    }
                }
            }
        }

        let warning = build_warning(&failed, &hints);
        if successful > 0 {
            info!("Search '{}' returned no listings", query);
            return SearchResponse {
                mode: SearchMode::Live,
                warning,
                provider_errors,
                ..Default::default()
            };
        }

        warn!("Search '{}' failed on every provider", query);
        SearchResponse {
            mode: SearchMode::Unavailable,
            error: Some(SearchFailure::Unavailable {
                warning: warning.clone(),
                cause: root_cause(&provider_errors),
            }),
            warning,
            provider_errors,
            ..Default::default()
        }
    }
}

/// Trimmed provider name; blank names are reported as "Provider"
fn display_name(provider: &dyn SearchProvider) -> String {
    let name = provider.name().trim();
    if name.is_empty() {
        "Provider".to_string()
    } else {
        name.to_string()
    }
}

/// User-facing advice for failures that carry an HTTP status
fn actionable_hint(provider: &str, error: &FetchError) -> Option<String> {
    let status = error.status()?;

    let hint = match status {
        401 | 403 => match key_var(provider) {
            Some(key) => format!("{} auth failed. Check {}.", provider, key),
            None => format!("{} auth failed. Check API key.", provider),
        },
        429 => format!("{} rate limited. Try again in 60s.", provider),
        status if status >= 500 => format!(
            "{} service error ({}). Try again shortly.",
            provider, status
        ),
        _ => format!("{} request failed ({}).", provider, status),
    };
    Some(hint)
}

fn build_warning(failed: &[String], hints: &[String]) -> String {
    if !hints.is_empty() {
        hints.join(" ")
    } else if !failed.is_empty() {
        format!("Live search unavailable ({}).", failed.join(", "))
    } else {
        String::new()
    }
}

/// First cancellation, else first deadline expiry, else first error
fn root_cause(errors: &[ProviderError]) -> Option<Arc<FetchError>> {
    errors
        .iter()
        .find(|e| e.kind == ProviderErrorKind::Canceled)
        .or_else(|| errors.iter().find(|e| e.kind == ProviderErrorKind::Timeout))
        .or_else(|| errors.first())
        .map(|e| Arc::clone(&e.error))
}
