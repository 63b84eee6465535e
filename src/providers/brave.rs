//! Brave Search provider
//!
//! Uses the Brave web search API with a site-restricted marketplace query.

use super::error::FetchError;
use super::traits::{ProviderOptions, SearchProvider, DEFAULT_BRAVE_SEARCH_URL};
use crate::network::{HttpClient, ProviderRequest};
use crate::results::{parse_listings, Listing, RawSearchResult};
use crate::search::SearchContext;
use async_trait::async_trait;
use serde::Deserialize;

/// Brave Search provider
pub struct Brave {
    options: ProviderOptions,
    client: HttpClient,
}

#[derive(Debug, Default, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: BraveWeb,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<RawSearchResult>,
}

impl Brave {
    pub const NAME: &'static str = "Brave";
    pub const KEY_VAR: &'static str = "BRAVE_API_KEY";

    pub fn new(api_key: &str, search_url: Option<&str>, client: HttpClient) -> Self {
        Self::with_options(
            ProviderOptions::new(api_key, search_url, DEFAULT_BRAVE_SEARCH_URL),
            client,
        )
    }

    pub fn with_options(options: ProviderOptions, client: HttpClient) -> Self {
        Self { options, client }
    }

    fn build_request(&self, query: &str) -> ProviderRequest {
        let search_query = format!(
            "{} price (site:ebay.com OR site:mercari.com OR site:amazon.com)",
            query
        );

        ProviderRequest::get(&self.options.search_url)
            .param("q", search_query)
            .param("count", self.options.max_results.to_string())
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.options.api_key)
    }
}

#[async_trait]
impl SearchProvider for Brave {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn configured(&self) -> bool {
        self.options.has_key()
    }

    async fn search(&self, ctx: &SearchContext, query: &str) -> Result<Vec<Listing>, FetchError> {
        if !self.configured() {
            return Err(FetchError::NotConfigured(Self::KEY_VAR.to_string()));
        }

        let response = self
            .client
            .execute(ctx, Self::NAME, self.build_request(query))
            .await?;
        let body: BraveResponse = response.json(Self::NAME)?;

        Ok(parse_listings(&body.web.results))
    }
}
