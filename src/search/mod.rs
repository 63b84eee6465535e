//! Search orchestration module
//!
//! Dispatches a query to providers in priority order, classifies their
//! failures, and reports which provider answered.

mod context;
mod executor;
mod generation;
mod models;

pub use context::SearchContext;
pub use executor::PriceSearch;
pub use generation::{SearchGeneration, SearchTicket};
pub use models::*;
