//! Error types for the rate limiter.

use std::time::Duration;

/// Errors returned by rate limiter admission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    /// The caller's cancellation token fired while waiting for a slot.
    #[error("rate limiter wait cancelled")]
    Cancelled,
    /// `try_acquire` found the window full.
    #[error("rate window full, a slot frees in {retry_after:?}")]
    WouldWait {
        /// Time until the oldest admission ages out of the window.
        retry_after: Duration,
    },
}

impl RateLimitError {
    /// Returns `true` if admission was abandoned due to cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RateLimitError::Cancelled)
    }
}
