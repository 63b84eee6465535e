//! Tavily search provider

use super::error::FetchError;
use super::traits::{ProviderOptions, SearchProvider, DEFAULT_TAVILY_SEARCH_URL};
use crate::network::{HttpClient, ProviderRequest};
use crate::results::{null_as_empty, parse_listings, Listing, RawSearchResult};
use crate::search::SearchContext;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Tavily search provider
pub struct Tavily {
    options: ProviderOptions,
    client: HttpClient,
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    content: String,
}

impl From<TavilyResult> for RawSearchResult {
    fn from(result: TavilyResult) -> Self {
        RawSearchResult::new(result.url, result.title, result.content)
    }
}

impl Tavily {
    pub const NAME: &'static str = "Tavily";
    pub const KEY_VAR: &'static str = "TAVILY_API_KEY";

    pub fn new(api_key: &str, search_url: Option<&str>, client: HttpClient) -> Self {
        Self::with_options(
            ProviderOptions::new(api_key, search_url, DEFAULT_TAVILY_SEARCH_URL),
            client,
        )
    }

    pub fn with_options(options: ProviderOptions, client: HttpClient) -> Self {
        Self { options, client }
    }

    fn build_request(&self, query: &str) -> ProviderRequest {
        ProviderRequest::post(&self.options.search_url).json(json!({
            "api_key": self.options.api_key,
            "query": format!("{} price ebay OR mercari OR amazon", query),
            "max_results": self.options.max_results,
        }))
    }
}

#[async_trait]
impl SearchProvider for Tavily {
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
        let body: TavilyResponse = response.json(Self::NAME)?;

        let raw: Vec<RawSearchResult> = body.results.into_iter().map(Into::into).collect();
        Ok(parse_listings(&raw))
    }
}
