//! HTTP client for making requests to search providers

use crate::config::SearchSettings;
use crate::providers::{FetchError, StatusError};
use crate::search::SearchContext;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP request built by a provider adapter
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters, in insertion order
    pub params: Vec<(String, String)>,
    /// JSON body
    pub json: Option<serde_json::Value>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Get)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url, HttpMethod::Post)
    }

    fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            params: Vec::new(),
            json: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Set a JSON body
    pub fn json(mut self, json: serde_json::Value) -> Self {
        self.json = Some(json);
        self
    }
}

/// Successful (2xx) HTTP response
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub text: String,
}

impl ProviderResponse {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self, provider: &str) -> Result<T, FetchError> {
        serde_json::from_str(&self.text).map_err(|source| FetchError::Decode {
            provider: provider.to_string(),
            source,
        })
    }
}

/// HTTP client wrapper shared by every provider adapter
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the given overall request timeout
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("mrktr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Create a client from search settings
    pub fn with_settings(settings: &SearchSettings) -> anyhow::Result<Self> {
        Self::new(settings.timeout_duration())
    }

    /// Execute a request under `ctx`.
    ///
    /// A done context fails before any I/O. Non-2xx responses become a
    /// [`StatusError`] carrying a summary of the body.
    pub async fn execute(
        &self,
        ctx: &SearchContext,
        provider: &str,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, FetchError> {
        ctx.run(self.send(provider, request)).await
    }

    async fn send(
        &self,
        provider: &str,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, FetchError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(json) = &request.json {
            req_builder = req_builder.json(json);
        }

        let transport = |source| FetchError::Transport {
            provider: provider.to_string(),
            source,
        };

        let response = req_builder.send().await.map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        debug!("{} responded with {}", provider, status.as_u16());

        if !status.is_success() {
            return Err(StatusError::new(provider, status.as_u16(), &text).into());
        }

        Ok(ProviderResponse {
            status: status.as_u16(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        assert!(HttpClient::new(Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_get_with_params_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "ps5 price"))
            .and(header("X-Token", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let request = ProviderRequest::get(format!("{}/search", server.uri()))
            .param("q", "ps5 price")
            .header("X-Token", "secret");
        let response = client()
            .execute(&SearchContext::new(), "Test", request)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let value: serde_json::Value = response.json("Test").unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_post_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({"query": "switch", "limit": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let request = ProviderRequest::post(format!("{}/search", server.uri()))
            .json(json!({"query": "switch", "limit": 3}));
        let response = client()
            .execute(&SearchContext::new(), "Test", request)
            .await;
        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn test_non_success_status_becomes_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("  upstream down \n"))
            .mount(&server)
            .await;

        let err = client()
            .execute(
                &SearchContext::new(),
                "Test",
                ProviderRequest::get(server.uri()),
            )
            .await
            .unwrap_err();

        match err {
            FetchError::Status(status) => {
                assert_eq!(status.provider, "Test");
                assert_eq!(status.status, 503);
                assert_eq!(status.body, "upstream down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_canceled_context_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let ctx = SearchContext::new();
        ctx.cancel();
        let err = client()
            .execute(&ctx, "Test", ProviderRequest::get(server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_canceled());
    }

    #[tokio::test]
    async fn test_deadline_interrupts_slow_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let ctx = SearchContext::new().with_timeout(Duration::from_millis(50));
        let err = client()
            .execute(&ctx, "Test", ProviderRequest::get(server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_decode_error() {
        let response = ProviderResponse {
            status: 200,
            text: "not json".to_string(),
        };
        let err = response.json::<serde_json::Value>("Brave").unwrap_err();
        assert!(err.to_string().starts_with("decode Brave response"));
    }
}
