//! Firecrawl search provider

use super::error::FetchError;
use super::traits::{ProviderOptions, SearchProvider, DEFAULT_FIRECRAWL_SEARCH_URL};
use crate::network::{HttpClient, ProviderRequest};
use crate::results::{parse_listings, Listing, RawSearchResult};
use crate::search::SearchContext;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Firecrawl search provider
pub struct Firecrawl {
    options: ProviderOptions,
    client: HttpClient,
}

#[derive(Debug, Default, Deserialize)]
struct FirecrawlResponse {
    #[serde(default)]
    data: Vec<RawSearchResult>,
}

impl Firecrawl {
    pub const NAME: &'static str = "Firecrawl";
    pub const KEY_VAR: &'static str = "FIRECRAWL_API_KEY";

    pub fn new(api_key: &str, search_url: Option<&str>, client: HttpClient) -> Self {
        Self::with_options(
            ProviderOptions::new(api_key, search_url, DEFAULT_FIRECRAWL_SEARCH_URL),
            client,
        )
    }

    pub fn with_options(options: ProviderOptions, client: HttpClient) -> Self {
        Self { options, client }
    }

    fn build_request(&self, query: &str) -> ProviderRequest {
        ProviderRequest::post(&self.options.search_url)
            .header("Authorization", format!("Bearer {}", self.options.api_key))
            .json(json!({
                "query": format!(
                    "{} price site:ebay.com OR site:mercari.com OR site:amazon.com",
                    query
                ),
                "limit": self.options.max_results,
            }))
    }
}

#[async_trait]
impl SearchProvider for Firecrawl {
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
        let body: FirecrawlResponse = response.json(Self::NAME)?;

        Ok(parse_listings(&body.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ListingStatus, Platform};
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_search_posts_documented_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .and(header("Authorization", "Bearer fc-key"))
            .and(body_json(json!({
                "query": "steam deck price site:ebay.com OR site:mercari.com OR site:amazon.com",
                "limit": 5,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[
                    {"url":"https://www.amazon.com/dp/B0","title":"Steam Deck 512GB","description":"Sold for $350"}
                ]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let options = ProviderOptions::new(
            "fc-key",
            Some(&format!("{}/v1/search", server.uri())),
            DEFAULT_FIRECRAWL_SEARCH_URL,
        )
        .with_max_results(5);
        let firecrawl = Firecrawl::with_options(options, client());
        let listings = firecrawl
            .search(&SearchContext::new(), "steam deck")
            .await
            .unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].platform(), Platform::Amazon);
        assert_eq!(listings[0].price(), 350.0);
        assert_eq!(listings[0].status(), ListingStatus::Sold);
    }

    #[tokio::test]
    async fn test_null_fields_keep_listing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"url":"https://www.mercari.com/us/item/m1","title":null,"description":"Switch $180"}]}"#,
            ))
            .mount(&server)
            .await;

        let firecrawl = Firecrawl::new("key", Some(&server.uri()), client());
        let listings = firecrawl
            .search(&SearchContext::new(), "switch")
            .await
            .unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].platform(), Platform::Mercari);
        assert_eq!(listings[0].price(), 180.0);
        assert_eq!(listings[0].title(), "");
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let firecrawl = Firecrawl::new("key", Some(&server.uri()), client());
        let err = firecrawl
            .search(&SearchContext::new(), "ps5")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn test_unconfigured_names_key() {
        let firecrawl = Firecrawl::new("", None, client());
        let err = firecrawl
            .search(&SearchContext::new(), "ps5")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "FIRECRAWL_API_KEY not set");
    }
}
