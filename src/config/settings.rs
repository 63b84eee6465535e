//! Settings structures for mrktr configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables that configure mrktr
pub const BRAVE_API_KEY: &str = "BRAVE_API_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";
pub const FIRECRAWL_API_KEY: &str = "FIRECRAWL_API_KEY";
pub const MRKTR_TIMEOUT: &str = "MRKTR_TIMEOUT";
pub const MRKTR_CATALOG_PATH: &str = "MRKTR_CATALOG_PATH";

/// Keys accepted from a `.env` file
pub const ALLOWED_ENV_KEYS: [&str; 5] = [
    BRAVE_API_KEY,
    TAVILY_API_KEY,
    FIRECRAWL_API_KEY,
    MRKTR_TIMEOUT,
    MRKTR_CATALOG_PATH,
];

/// Main settings structure (mrktr.yml)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub catalog: CatalogSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            catalog: CatalogSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Merge with variables from `lookup`. Blank values are ignored.
    pub fn merge_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        for (kind, key) in [
            ("brave", BRAVE_API_KEY),
            ("tavily", TAVILY_API_KEY),
            ("firecrawl", FIRECRAWL_API_KEY),
        ] {
            if let Some(api_key) = var(key) {
                for provider in self.providers.iter_mut().filter(|p| p.kind == kind) {
                    provider.api_key = Some(api_key.clone());
                }
            }
        }

        if let Some(timeout) = var(MRKTR_TIMEOUT).and_then(|v| v.parse::<f64>().ok()) {
            if timeout.is_finite() && timeout > 0.0 {
                self.search.timeout = timeout;
            }
        }

        if let Some(path) = var(MRKTR_CATALOG_PATH) {
            self.catalog.path = Some(PathBuf::from(path));
        }
    }

    /// Get provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// HTTP request timeout in seconds
    pub timeout: f64,
    /// Results requested from each provider
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout: 30.0,
            max_results: 20,
        }
    }
}

impl SearchSettings {
    /// Request timeout, falling back to the default when not positive
    pub fn timeout_duration(&self) -> Duration {
        if self.timeout.is_finite() && self.timeout > 0.0 {
            Duration::from_secs_f64(self.timeout)
        } else {
            Duration::from_secs_f64(Self::default().timeout)
        }
    }
}

/// Product catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// JSON catalog replacing the embedded one
    pub path: Option<PathBuf>,
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Display name
    pub name: String,
    /// Provider implementation (brave, tavily, firecrawl)
    pub kind: String,
    /// API key; usually supplied through the environment
    pub api_key: Option<String>,
    /// Override for the provider's search endpoint
    pub search_url: Option<String>,
    /// Whether the provider is disabled
    pub disabled: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: String::new(),
            api_key: None,
            search_url: None,
            disabled: false,
        }
    }
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new("Brave", "brave"),
        ProviderConfig::new("Tavily", "tavily"),
        ProviderConfig::new("Firecrawl", "firecrawl"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search.timeout, 30.0);
        assert_eq!(settings.search.max_results, 20);
        assert!(settings.catalog.path.is_none());

        let kinds: Vec<&str> = settings.providers.iter().map(|p| p.kind.as_str()).collect();
        assert_eq!(kinds, vec!["brave", "tavily", "firecrawl"]);
    }

    #[test]
    fn test_provider_lookup() {
        let settings = Settings::default();
        let tavily = settings.get_provider("Tavily");
        assert!(tavily.is_some());
        assert_eq!(tavily.unwrap().api_key(), "");
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "search:\n  timeout: 5.5\nproviders:\n  - name: Tavily\n    kind: tavily\n  - name: Brave\n    kind: brave\n    disabled: true\n"
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.search.timeout, 5.5);
        assert_eq!(settings.search.max_results, 20);
        assert_eq!(settings.providers.len(), 2);

        assert!(!settings.get_provider("Tavily").unwrap().disabled);
        assert!(settings.get_provider("Brave").unwrap().disabled);
    }

    #[test]
    fn test_from_file_reports_path() {
        let err = Settings::from_file("/nonexistent/mrktr.yml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mrktr.yml"));
    }

    #[test]
    fn test_merge_env_with() {
        let vars: HashMap<&str, &str> = [
            (BRAVE_API_KEY, " brave-key "),
            (TAVILY_API_KEY, "   "),
            (MRKTR_TIMEOUT, "12"),
            (MRKTR_CATALOG_PATH, "/tmp/products.json"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.merge_env_with(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.get_provider("Brave").unwrap().api_key(), "brave-key");
        assert_eq!(settings.get_provider("Tavily").unwrap().api_key, None);
        assert_eq!(settings.search.timeout, 12.0);
        assert_eq!(
            settings.catalog.path.as_deref(),
            Some(Path::new("/tmp/products.json"))
        );
    }

    #[test]
    fn test_invalid_timeout_ignored() {
        let mut settings = Settings::default();
        settings.merge_env_with(|key| (key == MRKTR_TIMEOUT).then(|| "-3".to_string()));
        assert_eq!(settings.search.timeout, 30.0);

        settings.search.timeout = 0.0;
        assert_eq!(settings.search.timeout_duration(), Duration::from_secs(30));
    }
}
