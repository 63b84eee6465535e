//! Per-call cancellation context

use crate::providers::FetchError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus optional deadline, passed to every provider call.
///
/// Cloning shares the same token: canceling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl SearchContext {
    /// A context that is never canceled and has no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline; an earlier existing deadline is kept
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Context canceled together with this one, but cancelable on its own
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Why the context is done, if it is
    pub fn err(&self) -> Option<FetchError> {
        if self.token.is_cancelled() {
            return Some(FetchError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(FetchError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Run `fut` until it completes, the context is canceled, or the
    /// deadline passes. A context that is already done never polls `fut`.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(FetchError::Canceled),
            _ = expired => Err(FetchError::DeadlineExceeded),
            result = fut => result,
        }
    }
}
