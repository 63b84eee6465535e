//! Provider traits and shared constants

use super::error::FetchError;
use crate::results::Listing;
use crate::search::SearchContext;
use async_trait::async_trait;

pub const DEFAULT_BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";
pub const DEFAULT_TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
pub const DEFAULT_FIRECRAWL_SEARCH_URL: &str = "https://api.firecrawl.dev/v1/search";

/// Results requested from each provider per search
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// A live search backend that turns a query into priced listings
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Display name used in warnings and diagnostics
    fn name(&self) -> &str;

    /// Whether the provider has usable credentials
    fn configured(&self) -> bool;

    /// Search for listings. Must return promptly once `ctx` is canceled.
    async fn search(&self, ctx: &SearchContext, query: &str) -> Result<Vec<Listing>, FetchError>;
}

/// Connection details shared by the HTTP-backed providers
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub api_key: String,
    pub search_url: String,
    pub max_results: usize,
}

impl ProviderOptions {
    /// Options with a trimmed key; a blank URL falls back to `default_url`
    pub fn new(api_key: &str, search_url: Option<&str>, default_url: &str) -> Self {
        let search_url = search_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(default_url);

        Self {
            api_key: api_key.trim().to_string(),
            search_url: search_url.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = ProviderOptions::new("  key  ", Some("   "), DEFAULT_TAVILY_SEARCH_URL);
        assert_eq!(options.api_key, "key");
        assert_eq!(options.search_url, DEFAULT_TAVILY_SEARCH_URL);
        assert_eq!(options.max_results, DEFAULT_MAX_RESULTS);
        assert!(options.has_key());

        let blank = ProviderOptions::new(" ", None, DEFAULT_BRAVE_SEARCH_URL).with_max_results(0);
        assert!(!blank.has_key());
        assert_eq!(blank.max_results, 1);
    }
}
