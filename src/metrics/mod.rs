//! Metrics collection module
//!
//! Tracks provider performance, error rates, and usage statistics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Response times kept per provider
const RESPONSE_TIME_WINDOW: usize = 100;

/// Metrics collector shared with the orchestrator
pub struct Metrics {
    /// Total search count
    pub total_searches: AtomicU64,
    /// Calls per provider
    provider_calls: RwLock<HashMap<String, u64>>,
    /// Provider response times in ms (last 100)
    provider_response_times: RwLock<HashMap<String, Vec<u64>>>,
    /// Provider error counts, keyed by provider then error kind
    provider_errors: RwLock<HashMap<String, HashMap<String, u64>>>,
    /// Provider success counts
    provider_successes: RwLock<HashMap<String, u64>>,
    /// Successful calls that returned no listings
    provider_empty: RwLock<HashMap<String, u64>>,
}

fn bump(map: &RwLock<HashMap<String, u64>>, provider: &str) {
    let mut map = map.write().unwrap_or_else(PoisonError::into_inner);
    *map.entry(provider.to_string()).or_insert(0) += 1;
}

fn count(map: &RwLock<HashMap<String, u64>>, provider: &str) -> u64 {
    let map = map.read().unwrap_or_else(PoisonError::into_inner);
    map.get(provider).copied().unwrap_or(0)
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            provider_calls: RwLock::new(HashMap::new()),
            provider_response_times: RwLock::new(HashMap::new()),
            provider_errors: RwLock::new(HashMap::new()),
            provider_successes: RwLock::new(HashMap::new()),
            provider_empty: RwLock::new(HashMap::new()),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a provider call
    pub fn record_provider_call(&self, provider: &str) {
        bump(&self.provider_calls, provider);
    }

    /// Record provider response time
    pub fn record_response_time(&self, provider: &str, time_ms: u64) {
        let mut times = self
            .provider_response_times
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = times.entry(provider.to_string()).or_default();

        if entry.len() >= RESPONSE_TIME_WINDOW {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    /// Record a provider error of the given kind
    pub fn record_error(&self, provider: &str, kind: &str) {
        let mut errors = self
            .provider_errors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *errors
            .entry(provider.to_string())
            .or_default()
            .entry(kind.to_string())
            .or_insert(0) += 1;
    }

    /// Record provider success; `empty` when it returned no listings
    pub fn record_success(&self, provider: &str, empty: bool) {
        bump(&self.provider_successes, provider);
        if empty {
            bump(&self.provider_empty, provider);
        }
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a provider
    pub fn get_avg_response_time(&self, provider: &str) -> Option<u64> {
        let times = self
            .provider_response_times
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        times.get(provider).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                let total: u128 = t.iter().map(|&ms| u128::from(ms)).sum();
                let avg = total / t.len() as u128;
                Some(u64::try_from(avg).unwrap_or(u64::MAX))
            }
        })
    }

    /// Errors for a provider, by kind
    pub fn get_errors(&self, provider: &str) -> HashMap<String, u64> {
        let errors = self
            .provider_errors
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        errors.get(provider).cloned().unwrap_or_default()
    }

    fn error_count(&self, provider: &str) -> u64 {
        self.get_errors(provider).values().sum()
    }

    /// Get reliability percentage for a provider
    pub fn get_reliability(&self, provider: &str) -> f64 {
        let error_count = self.error_count(provider);
        let success_count = count(&self.provider_successes, provider);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Get all provider statistics
    pub fn get_provider_stats(&self) -> HashMap<String, ProviderStats> {
        let providers: Vec<String> = {
            let calls = self
                .provider_calls
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            calls.keys().cloned().collect()
        };

        providers
            .into_iter()
            .map(|provider| {
                let stats = ProviderStats {
                    calls: count(&self.provider_calls, &provider),
                    successes: count(&self.provider_successes, &provider),
                    empty_results: count(&self.provider_empty, &provider),
                    errors: self.error_count(&provider),
                    avg_response_time: self.get_avg_response_time(&provider),
                    reliability: self.get_reliability(&provider),
                };
                (provider, stats)
            })
            .collect()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderStats {
    pub calls: u64,
    pub successes: u64,
    pub empty_results: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        metrics.record_provider_call("Brave");
        metrics.record_response_time("Brave", 100);
        metrics.record_success("Brave", false);

        assert_eq!(metrics.get_total_searches(), 1);
        assert_eq!(metrics.get_avg_response_time("Brave"), Some(100));
        assert_eq!(metrics.get_reliability("Brave"), 100.0);
    }

    #[test]
    fn test_errors_by_kind() {
        let metrics = Metrics::new();
        for _ in 0..3 {
            metrics.record_provider_call("Tavily");
        }
        metrics.record_error("Tavily", "rate_limit");
        metrics.record_error("Tavily", "rate_limit");
        metrics.record_success("Tavily", true);

        assert_eq!(metrics.get_errors("Tavily").get("rate_limit"), Some(&2));
        assert!((metrics.get_reliability("Tavily") - 100.0 / 3.0).abs() < 1e-9);

        let stats = metrics.get_provider_stats();
        let tavily = &stats["Tavily"];
        assert_eq!(tavily.calls, 3);
        assert_eq!(tavily.errors, 2);
        assert_eq!(tavily.empty_results, 1);
        assert_eq!(tavily.avg_response_time, None);
    }

    #[test]
    fn test_response_time_window() {
        let metrics = Metrics::new();
        metrics.record_response_time("Brave", 10_000);
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_response_time("Brave", 10);
        }
        assert_eq!(metrics.get_avg_response_time("Brave"), Some(10));
    }

    #[test]
    fn test_avg_response_time_saturates() {
        let metrics = Metrics::new();
        metrics.record_response_time("Brave", u64::MAX);
        metrics.record_response_time("Brave", u64::MAX);
        assert_eq!(metrics.get_avg_response_time("Brave"), Some(u64::MAX));
    }
}
