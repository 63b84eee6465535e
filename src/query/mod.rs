//! Query understanding module
//!
//! Builds a small TF-IDF model over a static product catalog and uses it to
//! rewrite vague queries into specific product names:
//! - `ps5` → `PlayStation 5 Console`
//! - `switch` stays `switch` when several products match equally well
//! - queries of more than three tokens are left alone
//!
//! Autocomplete over the same index lives in [`crate::autocomplete`].

mod catalog;
mod index;
pub mod vector;

pub use catalog::{default_catalog, embedded_catalog, load_catalog, ProductEntry};
pub use index::{
    ProductDocument, QueryIndex, MAX_EXPAND_TOKENS, MIN_EXPAND_SCORE, MIN_EXPAND_SEPARATION,
};
