//! Provider loader for initializing providers from configuration

use super::traits::{ProviderOptions, SearchProvider};
use super::{
    Brave, Firecrawl, Tavily, DEFAULT_BRAVE_SEARCH_URL, DEFAULT_FIRECRAWL_SEARCH_URL,
    DEFAULT_TAVILY_SEARCH_URL,
};
use crate::config::{ProviderConfig, Settings};
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Build every enabled provider, in the order settings list them
    pub fn load(settings: &Settings, client: &HttpClient) -> Vec<Arc<dyn SearchProvider>> {
        let mut providers = Vec::new();

        for config in &settings.providers {
            if config.disabled {
                info!("Skipping disabled provider: {}", config.name);
                continue;
            }

            match Self::create_provider(config, settings.search.max_results, client) {
                Ok(provider) => {
                    if provider.configured() {
                        info!("Loaded provider: {} ({})", provider.name(), config.kind);
                    } else {
                        info!("Provider {} has no API key", provider.name());
                    }
                    providers.push(provider);
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {}", config.name, e);
                }
            }
        }

        info!("Loaded {} providers", providers.len());
        providers
    }

    /// Create a provider instance by kind
    fn create_provider(
        config: &ProviderConfig,
        max_results: usize,
        client: &HttpClient,
    ) -> Result<Arc<dyn SearchProvider>> {
        let default_url = match config.kind.as_str() {
            "brave" => DEFAULT_BRAVE_SEARCH_URL,
            "tavily" => DEFAULT_TAVILY_SEARCH_URL,
            "firecrawl" => DEFAULT_FIRECRAWL_SEARCH_URL,
            other => {
                return Err(anyhow::anyhow!("Unknown provider kind: {}", other));
            }
        };

        let options = ProviderOptions::new(
            config.api_key(),
            config.search_url.as_deref(),
            default_url,
        )
        .with_max_results(max_results);
        let client = client.clone();

        let provider: Arc<dyn SearchProvider> = match config.kind.as_str() {
            "brave" => Arc::new(Brave::with_options(options, client)),
            "tavily" => Arc::new(Tavily::with_options(options, client)),
            _ => Arc::new(Firecrawl::with_options(options, client)),
        };
        Ok(provider)
    }
}
