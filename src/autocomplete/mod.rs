//! Autocomplete suggestions from the local product index
//!
//! Suggestions are ranked by how the typed prefix matches a product:
//! synonyms before names, whole-string prefixes before inner-token prefixes,
//! with TF-IDF similarity breaking ties inside each tier.

use crate::query::vector::{token_has_prefix, tokenize};
use crate::query::QueryIndex;
use std::collections::HashSet;

/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 6;

/// Shortest prefix that produces suggestions
pub const MIN_PREFIX_LEN: usize = 2;

const SYNONYM_PREFIX_SCORE: f64 = 4.0;
const SYNONYM_TOKEN_SCORE: f64 = 3.4;
const NAME_PREFIX_SCORE: f64 = 3.0;
const NAME_TOKEN_SCORE: f64 = 2.4;
const EXACT_BONUS: f64 = 1.0;

#[derive(Debug, Clone)]
struct Candidate<'a> {
    value: &'a str,
    score: f64,
}

/// Score a prefix against one candidate string, if it matches at all
fn match_score(candidate_lower: &str, prefix: &str, whole: f64, token: f64) -> Option<f64> {
    let score = if candidate_lower.starts_with(prefix) {
        whole
    } else if token_has_prefix(candidate_lower, prefix) {
        token
    } else {
        return None;
    };

    if candidate_lower == prefix {
        Some(score + EXACT_BONUS)
    } else {
        Some(score)
    }
}

impl QueryIndex {
    /// Ranked product suggestions for a typed prefix
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        if self.is_empty() || prefix.chars().count() < MIN_PREFIX_LEN {
            return vec![];
        }

        let query_vector = self.query_vector(&tokenize(&prefix));
        let mut candidates = Vec::new();

        for document in &self.documents {
            let base = query_vector.cosine(&document.vector);

            if let Some(score) = match_score(
                &document.name_lower,
                &prefix,
                NAME_PREFIX_SCORE,
                NAME_TOKEN_SCORE,
            ) {
                candidates.push(Candidate {
                    value: &document.entry.name,
                    score: score + base,
                });
            }

            for (synonym, synonym_lower) in document
                .entry
                .synonyms
                .iter()
                .zip(&document.synonyms_lower)
            {
                if let Some(score) = match_score(
                    synonym_lower,
                    &prefix,
                    SYNONYM_PREFIX_SCORE,
                    SYNONYM_TOKEN_SCORE,
                ) {
                    candidates.push(Candidate {
                        value: synonym,
                        score: score + base,
                    });
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.value.cmp(b.value))
        });

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| {
                let key = c.value.trim().to_lowercase();
                !key.is_empty() && seen.insert(key)
            })
            .take(MAX_SUGGESTIONS)
            .map(|c| c.value.to_string())
            .collect()
    }
}
