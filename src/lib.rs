//! mrktr: marketplace price lookup
//!
//! Turns a free-text shopping query into priced marketplace listings:
//! - [`query`] rewrites vague queries into catalog product names
//! - [`autocomplete`] suggests products for a typed prefix
//! - [`search`] asks live search providers in priority order
//! - [`results`] extracts price, condition and sale status from raw hits

pub mod autocomplete;
pub mod config;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod query;
pub mod results;
pub mod search;

pub use config::Settings;
pub use providers::{FetchError, SearchProvider};
pub use query::QueryIndex;
pub use results::{Listing, RawSearchResult};
pub use search::{PriceSearch, SearchContext, SearchResponse};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
