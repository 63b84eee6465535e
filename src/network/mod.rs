//! HTTP networking module
//!
//! Provides the HTTP client used by every search provider adapter.

mod client;

pub use client::{HttpClient, HttpMethod, ProviderRequest, ProviderResponse};
