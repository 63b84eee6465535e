//! TF-IDF product index and query expansion

use super::catalog::{embedded_catalog, load_catalog, ProductEntry};
use super::vector::{term_counts, tokenize, TermVector};
use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Queries with more tokens than this are assumed to be specific already
pub const MAX_EXPAND_TOKENS: usize = 3;
/// Minimum score for a rewrite
pub const MIN_EXPAND_SCORE: f64 = 0.34;
/// Minimum lead of the best match over the runner-up
pub const MIN_EXPAND_SEPARATION: f64 = 0.08;

const NAME_WEIGHT: f64 = 2.0;
const SYNONYM_WEIGHT: f64 = 1.5;
const CATEGORY_WEIGHT: f64 = 0.5;

const EXACT_MATCH_BONUS: f64 = 0.50;
const SYNONYM_PREFIX_BONUS: f64 = 0.10;
const MIN_SYNONYM_PREFIX_LEN: usize = 3;

/// A catalog entry prepared for matching
#[derive(Debug, Clone)]
pub struct ProductDocument {
    pub(crate) entry: ProductEntry,
    pub(crate) name_lower: String,
    pub(crate) synonyms_lower: Vec<String>,
    pub(crate) vector: TermVector,
}

impl ProductDocument {
    pub fn entry(&self) -> &ProductEntry {
        &self.entry
    }

    pub fn vector(&self) -> &TermVector {
        &self.vector
    }
}

/// Immutable product index used for query expansion and autocomplete.
///
/// Built once at startup; every query method takes `&self` and the index is
/// safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct QueryIndex {
    pub(crate) documents: Vec<ProductDocument>,
    idf: BTreeMap<String, f64>,
}

impl QueryIndex {
    /// Build an index from catalog entries
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ProductEntry>,
    {
        let mut documents = Vec::new();
        let mut document_terms = Vec::new();
        let mut df: BTreeMap<String, usize> = BTreeMap::new();

        for entry in entries.into_iter().map(ProductEntry::sanitized) {
            if entry.name.is_empty() {
                continue;
            }

            let name_tokens = tokenize(&entry.name);
            let synonym_tokens = tokenize(&entry.synonyms.join(" "));
            let category_tokens = tokenize(&entry.category);
            if name_tokens.is_empty() && synonym_tokens.is_empty() {
                continue;
            }

            let mut terms: BTreeMap<String, f64> = BTreeMap::new();
            for (tokens, weight) in [
                (&name_tokens, NAME_WEIGHT),
                (&synonym_tokens, SYNONYM_WEIGHT),
                (&category_tokens, CATEGORY_WEIGHT),
            ] {
                for token in tokens {
                    *terms.entry(token.clone()).or_insert(0.0) += weight;
                }
            }

            for term in terms.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }

            documents.push(ProductDocument {
                name_lower: entry.name.to_lowercase(),
                synonyms_lower: entry.synonyms.iter().map(|s| s.to_lowercase()).collect(),
                entry,
                vector: TermVector::default(),
            });
            document_terms.push(terms);
        }

        let n = document_terms.len() as f64;
        let idf: BTreeMap<String, f64> = df
            .into_iter()
            .map(|(term, count)| (term, ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0))
            .collect();

        for (document, terms) in documents.iter_mut().zip(&document_terms) {
            document.vector = TermVector::weighted(terms, &idf).normalized();
        }

        debug!(
            "Built query index with {} documents and {} terms",
            documents.len(),
            idf.len()
        );

        Self { documents, idf }
    }

    /// Index over the catalog embedded in the binary
    pub fn embedded() -> Self {
        Self::build(embedded_catalog())
    }

    /// Index over a JSON catalog file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::build(load_catalog(path)?))
    }

    /// Number of indexed products
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[ProductDocument] {
        &self.documents
    }

    /// Inverse document frequency of a term, if it occurs in the catalog
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Unit TF-IDF vector for free text, using the catalog idf table
    pub(crate) fn query_vector(&self, tokens: &[String]) -> TermVector {
        TermVector::weighted(&term_counts(tokens), &self.idf).normalized()
    }

    /// Rewrite a vague query into the best matching product name.
    ///
    /// The rewrite only happens when the match is confident and clearly ahead
    /// of the runner-up; otherwise the trimmed query comes back unchanged.
    pub fn expand(&self, query: &str) -> String {
        let trimmed = query.trim();
        if trimmed.is_empty() || self.is_empty() {
            return trimmed.to_string();
        }

        let tokens = tokenize(trimmed);
        if tokens.is_empty() || tokens.len() > MAX_EXPAND_TOKENS {
            return trimmed.to_string();
        }

        let query_vector = self.query_vector(&tokens);
        if query_vector.is_empty() {
            return trimmed.to_string();
        }

        let query_lower = trimmed.to_lowercase();
        let mut best: Option<&ProductDocument> = None;
        let mut top_score = 0.0;
        let mut second_score = 0.0;

        for document in &self.documents {
            let score = expansion_score(document, &query_vector, &query_lower);
            if score > top_score {
                second_score = top_score;
                top_score = score;
                best = Some(document);
            } else if score > second_score {
                second_score = score;
            }
        }

        let Some(best) = best else {
            return trimmed.to_string();
        };

        if top_score < MIN_EXPAND_SCORE
            || top_score - second_score < MIN_EXPAND_SEPARATION
            || best.name_lower == query_lower
        {
            return trimmed.to_string();
        }

        debug!(
            "Expanded '{}' to '{}' (score {:.3}, runner-up {:.3})",
            trimmed, best.entry.name, top_score, second_score
        );
        best.entry.name.clone()
    }

    /// Distinct product names, in catalog order
    pub fn product_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.documents
            .iter()
            .map(|d| d.entry.name.as_str())
            .filter(|name| seen.insert(name.to_lowercase()))
            .collect()
    }
}

fn expansion_score(document: &ProductDocument, query_vector: &TermVector, query_lower: &str) -> f64 {
    let mut score = query_vector.cosine(&document.vector);

    if document.name_lower == query_lower {
        score += EXACT_MATCH_BONUS;
    }

    if document.synonyms_lower.iter().any(|s| s == query_lower) {
        score += EXACT_MATCH_BONUS;
    } else if query_lower.chars().count() >= MIN_SYNONYM_PREFIX_LEN
        && document
            .synonyms_lower
            .iter()
            .any(|s| s.starts_with(query_lower))
    {
        score += SYNONYM_PREFIX_BONUS;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, category: &str, synonyms: &[&str]) -> ProductEntry {
        ProductEntry::new(name, category).with_synonyms(synonyms.iter().copied())
    }

    #[test]
    fn test_expand_uses_high_confidence_match() {
        let index = QueryIndex::build(vec![
            entry("PlayStation 5 Console", "Gaming", &["ps5", "playstation 5"]),
            entry("Nintendo Switch OLED", "Gaming", &["switch"]),
        ]);

        assert_eq!(index.expand("ps5"), "PlayStation 5 Console");
        assert_eq!(index.expand("  PS5 "), "PlayStation 5 Console");
    }

    #[test]
    fn test_expand_keeps_ambiguous_query() {
        let index = QueryIndex::build(vec![
            entry("Nintendo Switch OLED", "Gaming", &["switch"]),
            entry("Nintendo Switch Lite", "Gaming", &["switch"]),
        ]);

        assert_eq!(index.expand("switch"), "switch");
    }

    #[test]
    fn test_expand_handles_empty_and_unknown_queries() {
        let index = QueryIndex::build(vec![entry("AirPods Pro 2", "Audio", &["airpods pro"])]);

        for query in ["", "   ", "totally unknown item"] {
            assert_eq!(index.expand(query), query.trim());
        }
    }

    #[test]
    fn test_expand_skips_long_queries() {
        let index = QueryIndex::build(vec![entry(
            "PlayStation 5 Console",
            "Gaming",
            &["ps5"],
        )]);

        assert_eq!(index.expand("ps5 console with two pads"), "ps5 console with two pads");
    }

    #[test]
    fn test_expand_returns_input_when_already_the_name() {
        let index = QueryIndex::build(vec![
            entry("Steam Deck", "Gaming", &["deck"]),
            entry("AirPods Max", "Audio", &["airpods max"]),
        ]);

        assert_eq!(index.expand("steam deck"), "steam deck");
    }

    #[test]
    fn test_empty_index_returns_trimmed_query() {
        let index = QueryIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.expand(" ps5 "), "ps5");
    }

    #[test]
    fn test_build_skips_nameless_and_tokenless_entries() {
        let index = QueryIndex::build(vec![
            entry("   ", "Gaming", &["ps5"]),
            entry("---", "Gaming", &[]),
            entry("Xbox Series X", "Gaming", &["xsx"]),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.product_names(), vec!["Xbox Series X"]);
    }

    #[test]
    fn test_idf_favours_rare_terms() {
        let index = QueryIndex::build(vec![
            entry("Nintendo Switch OLED", "Gaming", &[]),
            entry("Nintendo Switch Lite", "Gaming", &[]),
            entry("Nintendo 3DS", "Gaming", &[]),
        ]);

        let common = index.idf("nintendo").unwrap();
        let rare = index.idf("oled").unwrap();
        assert!((common - 1.0).abs() < 1e-12);
        assert!(rare > common);
        assert!(index.idf("edition").is_none());
    }

    #[test]
    fn test_expand_is_repeatable() {
        let index = QueryIndex::embedded();
        let first = index.expand("ps5");
        for _ in 0..10 {
            assert_eq!(index.expand("ps5"), first);
        }
    }

    #[test]
    fn test_index_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryIndex>();
    }
}
