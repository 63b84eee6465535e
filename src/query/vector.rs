//! Tokenization and sparse TF-IDF vectors

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9]+").expect("valid token pattern"));

/// Words that carry no product identity
const STOP_WORDS: &[&str] = &["and", "the", "for", "with", "new", "used", "edition"];

/// Lowercase alphanumeric tokens of `text`, stop words included
pub fn raw_tokens(text: &str) -> Vec<String> {
    TOKEN_PATTERN
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Lowercase alphanumeric tokens of `text` with stop words removed
pub fn tokenize(text: &str) -> Vec<String> {
    raw_tokens(text)
        .into_iter()
        .filter(|token| !STOP_WORDS.contains(&token.as_str()))
        .collect()
}

/// Whether any token of `text` starts with `prefix`
pub fn token_has_prefix(text: &str, prefix: &str) -> bool {
    !prefix.is_empty() && raw_tokens(text).iter().any(|token| token.starts_with(prefix))
}

/// Raw term frequencies, one per occurrence
pub fn term_counts(tokens: &[String]) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Sparse term → weight vector.
///
/// Terms are kept ordered so every sum over a vector is evaluated in the
/// same order, which keeps scores reproducible bit for bit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector(BTreeMap<String, f64>);

impl TermVector {
    /// Sublinear TF-IDF weighting: `(1 + ln(tf)) * idf(t)`.
    ///
    /// Terms missing from the idf table are dropped.
    pub fn weighted(counts: &BTreeMap<String, f64>, idf: &BTreeMap<String, f64>) -> Self {
        let weights = counts
            .iter()
            .filter_map(|(term, &tf)| {
                idf.get(term)
                    .map(|&term_idf| (term.clone(), (1.0 + tf.ln()) * term_idf))
            })
            .collect();
        Self(weights)
    }

    /// Scale to unit length. Empty and zero-norm vectors become empty.
    pub fn normalized(self) -> Self {
        let norm: f64 = self.0.values().map(|w| w * w).sum();
        if norm == 0.0 || !norm.is_finite() {
            return Self::default();
        }

        let scale = 1.0 / norm.sqrt();
        Self(
            self.0
                .into_iter()
                .map(|(term, weight)| (term, weight * scale))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        self.0.get(term).copied()
    }

    /// Dot product; for unit vectors this is the cosine similarity.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }

        self.0
            .iter()
            .filter_map(|(term, left)| other.0.get(term).map(|right| left * right))
            .sum()
    }
}
