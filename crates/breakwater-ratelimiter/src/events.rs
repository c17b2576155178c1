use breakwater_core::events::PatternEvent;
use std::time::{Duration, Instant};

/// Events emitted by the rate limiter.
#[derive(Debug, Clone)]
pub enum RateLimiterEvent {
    /// A caller was admitted through the window.
    Admitted {
        source: String,
        timestamp: Instant,
        /// How long the caller waited for a slot. Zero when the window had
        /// room on arrival.
        waited: Duration,
    },
    /// The window was full and a caller started waiting for a slot.
    WaitStarted {
        source: String,
        timestamp: Instant,
        /// Admissions currently inside the window.
        admitted: usize,
        /// Configured window capacity.
        limit: usize,
        /// Expected wait until the oldest admission ages out.
        wait: Duration,
    },
}

impl PatternEvent for RateLimiterEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RateLimiterEvent::Admitted { .. } => "Admitted",
            RateLimiterEvent::WaitStarted { .. } => "WaitStarted",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RateLimiterEvent::Admitted { timestamp, .. }
            | RateLimiterEvent::WaitStarted { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            RateLimiterEvent::Admitted { source, .. }
            | RateLimiterEvent::WaitStarted { source, .. } => source,
        }
    }
}
