//! Listing types and extraction
//!
//! This module defines the listing record handed back to callers and the
//! heuristics that recover it from raw provider text.

pub mod extract;
mod types;

pub use extract::{parse_listing, parse_listings};
pub use types::*;
pub(crate) use types::null_as_empty;
