use breakwater_core::events::PatternEvent;
use breakwater_core::FaultClass;
use std::time::{Duration, Instant};

/// Events emitted by the retry executor.
#[derive(Debug, Clone)]
pub enum RetryEvent {
    /// A transient fault was recorded and a retry is about to sleep.
    Retry {
        source: String,
        timestamp: Instant,
        /// 1-based retry number.
        attempt: usize,
        /// The (jittered) delay before the retry runs.
        delay: Duration,
        /// Class of the fault that triggered the retry.
        class: FaultClass,
    },
    /// The operation succeeded, on the first try or after retries.
    Success {
        source: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// The operation failed after spending every scheduled retry.
    Exhausted {
        source: String,
        timestamp: Instant,
        attempts: usize,
    },
    /// A fault was classified permanent and not retried.
    Rejected {
        source: String,
        timestamp: Instant,
        class: FaultClass,
    },
}

impl PatternEvent for RetryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RetryEvent::Retry { .. } => "Retry",
            RetryEvent::Success { .. } => "Success",
            RetryEvent::Exhausted { .. } => "Exhausted",
            RetryEvent::Rejected { .. } => "Rejected",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RetryEvent::Retry { timestamp, .. }
            | RetryEvent::Success { timestamp, .. }
            | RetryEvent::Exhausted { timestamp, .. }
            | RetryEvent::Rejected { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            RetryEvent::Retry { source, .. }
            | RetryEvent::Success { source, .. }
            | RetryEvent::Exhausted { source, .. }
            | RetryEvent::Rejected { source, .. } => source,
        }
    }
}
