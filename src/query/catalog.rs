//! Product catalog entries and loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Catalog shipped inside the binary
const EMBEDDED_CATALOG: &str = include_str!("../../data/products.json");

/// One catalog product and the alias terms shoppers use for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl ProductEntry {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            synonyms: vec![],
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    /// Trim all fields and drop blank or case-insensitively repeated synonyms
    pub fn sanitized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();

        let mut seen = HashSet::new();
        self.synonyms = self
            .synonyms
            .iter()
            .map(|synonym| synonym.trim())
            .filter(|synonym| !synonym.is_empty())
            .filter(|synonym| seen.insert(synonym.to_lowercase()))
            .map(str::to_string)
            .collect();

        self
    }
}

/// Entries from the embedded catalog, or the built-in defaults when the
/// embedded data is unusable.
pub fn embedded_catalog() -> Vec<ProductEntry> {
    match serde_json::from_str::<Vec<ProductEntry>>(EMBEDDED_CATALOG) {
        Ok(entries) if !entries.is_empty() => entries,
        Ok(_) => default_catalog(),
        Err(e) => {
            warn!("Embedded product catalog is invalid, using defaults: {}", e);
            default_catalog()
        }
    }
}

/// Load a catalog from a JSON array of entries
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<ProductEntry>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let entries = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    Ok(entries)
}

/// Minimal catalog used when nothing else is available
pub fn default_catalog() -> Vec<ProductEntry> {
    vec![
        ProductEntry::new("Nintendo Switch OLED", "Gaming")
            .with_synonyms(["switch", "nintendo switch"]),
        ProductEntry::new("PlayStation 5 Console", "Gaming")
            .with_synonyms(["ps5", "playstation 5"]),
        ProductEntry::new("AirPods Pro 2", "Audio").with_synonyms(["airpods pro", "airpods"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_dedupes_synonyms() {
        let entry = ProductEntry::new("  Steam Deck OLED ", " Gaming ")
            .with_synonyms(["steam deck", " Steam Deck", "", "  ", "deck"])
            .sanitized();

        assert_eq!(entry.name, "Steam Deck OLED");
        assert_eq!(entry.category, "Gaming");
        assert_eq!(entry.synonyms, vec!["steam deck", "deck"]);
    }

    #[test]
    fn test_embedded_catalog_is_not_empty() {
        let entries = embedded_catalog();
        assert!(!entries.is_empty());
        assert!(entries.iter().any(|e| e.synonyms.iter().any(|s| s == "ps5")));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Game Boy Color", "synonyms": ["gbc"]}}]"#
        )
        .unwrap();

        let entries = load_catalog(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Game Boy Color");
        assert!(entries[0].category.is_empty());
    }

    #[test]
    fn test_load_catalog_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_catalog(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse catalog"));
    }
}
