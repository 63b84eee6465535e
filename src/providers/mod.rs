//! Search provider implementations
//!
//! Each provider turns a query into priced listings through one external
//! search API. Providers are loaded in priority order and queried one at a
//! time by [`crate::search::PriceSearch`].

mod brave;
mod error;
mod firecrawl;
mod loader;
mod stub;
mod tavily;
mod traits;

pub use brave::Brave;
pub use error::{summarize_body, FetchError, StatusError};
pub use firecrawl::Firecrawl;
pub use loader::ProviderLoader;
pub use stub::StubProvider;
pub use tavily::Tavily;
pub use traits::*;

/// Environment variable holding the API key of a known provider
pub fn key_var(provider: &str) -> Option<&'static str> {
    match provider {
        Brave::NAME => Some(Brave::KEY_VAR),
        Tavily::NAME => Some(Tavily::KEY_VAR),
        Firecrawl::NAME => Some(Firecrawl::KEY_VAR),
        _ => None,
    }
}
