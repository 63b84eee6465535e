//! Superseding in-flight searches
//!
//! A consumer that lets the user type a new query while the previous one is
//! still running begins a new generation for every search. Beginning a
//! generation cancels the previous context, and results are only accepted
//! when their sequence number is still the latest one issued.

use super::context::SearchContext;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Handle for one search generation
#[derive(Debug, Clone)]
pub struct SearchTicket {
    /// Monotonically increasing sequence number, starting at 1
    pub sequence: u64,
    /// Context to pass to the orchestrator for this search
    pub context: SearchContext,
}

/// Issues sequence-numbered search contexts and discards stale results
#[derive(Debug, Default)]
pub struct SearchGeneration {
    current: AtomicU64,
    active: Mutex<Option<SearchContext>>,
}

impl SearchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the in-flight search, if any, and start a new one
    pub fn begin(&self) -> SearchTicket {
        let context = SearchContext::new();
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = active.replace(context.clone()) {
            previous.cancel();
        }
        let sequence = self.current.fetch_add(1, Ordering::SeqCst) + 1;

        debug!("Started search generation {}", sequence);
        SearchTicket { sequence, context }
    }

    /// Latest issued sequence number (0 before the first search)
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, sequence: u64) -> bool {
        sequence != 0 && sequence == self.current()
    }

    /// Keep `value` only if it belongs to the latest generation
    pub fn accept<T>(&self, sequence: u64, value: T) -> Option<T> {
        if self.is_current(sequence) {
            Some(value)
        } else {
            debug!(
                "Discarding stale search result {} (current {})",
                sequence,
                self.current()
            );
            None
        }
    }

    /// Cancel the in-flight search without starting a new one
    pub fn cancel(&self) {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(context) = active.as_ref() {
            context.cancel();
        }
    }
}
