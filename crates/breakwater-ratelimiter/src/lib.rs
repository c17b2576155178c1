//! Sliding-window rate limiter for breakwater.
//!
//! [`RateLimiter`] admits at most `limit` callers in any window-sized span,
//! however the span is aligned. Admission timestamps live in a log that is
//! pruned as entries age out, so a burst that fills the window delays later
//! callers exactly until the oldest admission expires, not until some fixed
//! period boundary.
//!
//! Waiting is cooperative: [`acquire`](RateLimiter::acquire) takes a
//! [`CancellationToken`] and returns [`RateLimitError::Cancelled`] the moment
//! the token fires, leaving the window untouched.
//!
//! # Example
//!
//! ```
//! use breakwater_ratelimiter::RateLimiter;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let limiter = RateLimiter::builder()
//!     .limit(14)
//!     .window(Duration::from_secs(1))
//!     .name("queue-sends")
//!     .build();
//!
//! let cancel = CancellationToken::new();
//! limiter.acquire(&cancel).await.unwrap();
//! // ...perform the outbound call...
//! # }
//! ```

mod config;
mod error;
pub mod events;
mod window;

pub use config::{RateLimiterConfig, RateLimiterConfigBuilder};
pub use error::RateLimitError;
pub use events::RateLimiterEvent;

use std::sync::Mutex;
use tokio::sync::Semaphore;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use window::AdmissionLog;

#[cfg(feature = "metrics")]
use metrics::{counter, histogram};

#[cfg(feature = "tracing")]
use tracing::debug;

/// A sliding-window rate limiter.
///
/// Internally two pieces cooperate: a semaphore gate that bounds how many
/// callers contend for admission at once, and the admission log that enforces
/// the actual window. The gate keeps a stampede of waiters from hammering the
/// log mutex; each caller holds a gate permit only while it is being admitted.
pub struct RateLimiter {
    gate: Semaphore,
    log: Mutex<AdmissionLog>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Returns a builder for configuring a rate limiter.
    pub fn builder() -> RateLimiterConfigBuilder {
        RateLimiterConfigBuilder::new()
    }

    pub(crate) fn with_config(config: RateLimiterConfig) -> Self {
        Self {
            gate: Semaphore::new(config.limit),
            log: Mutex::new(AdmissionLog::new(config.limit, config.window)),
            config,
        }
    }

    /// Waits until the window has room, then records an admission.
    ///
    /// Callers are admitted immediately while fewer than `limit` admissions
    /// sit inside the window; otherwise they sleep until the oldest admission
    /// ages out and try again. Cancellation is honored at every await point
    /// and leaves no trace in the window.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), RateLimitError> {
        let start = Instant::now();

        let _permit = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RateLimitError::Cancelled),
            permit = self.gate.acquire() => {
                // The gate is never closed, so acquire cannot fail; mapping
                // keeps a panic out of the admission path all the same.
                permit.map_err(|_| RateLimitError::Cancelled)?
            }
        };

        loop {
            let decision = {
                let mut log = self.log.lock().unwrap();
                let now = Instant::now();
                log.prune(now);
                if log.is_full() {
                    match log.next_expiry() {
                        Some(expiry) => Err((log.len(), expiry)),
                        // is_full implies a front entry; fall back to now.
                        None => Err((log.len(), now)),
                    }
                } else {
                    log.record(now);
                    Ok(())
                }
            };

            match decision {
                Ok(()) => {
                    let waited = start.elapsed();

                    #[cfg(feature = "metrics")]
                    {
                        counter!("ratelimiter_calls_total", "ratelimiter" => self.config.name.clone(), "result" => "admitted")
                            .increment(1);
                        histogram!("ratelimiter_wait_duration_seconds", "ratelimiter" => self.config.name.clone())
                            .record(waited.as_secs_f64());
                    }

                    #[cfg(feature = "tracing")]
                    debug!(ratelimiter = %self.config.name, waited = ?waited, "Admitted");

                    let event = RateLimiterEvent::Admitted {
                        source: self.config.name.clone(),
                        timestamp: std::time::Instant::now(),
                        waited,
                    };
                    self.config.event_listeners.emit(&event);

                    return Ok(());
                }
                Err((admitted, expiry)) => {
                    let wait = expiry.saturating_duration_since(Instant::now());

                    #[cfg(feature = "metrics")]
                    counter!("ratelimiter_waits_total", "ratelimiter" => self.config.name.clone())
                        .increment(1);

                    #[cfg(feature = "tracing")]
                    debug!(
                        ratelimiter = %self.config.name,
                        admitted,
                        limit = self.config.limit,
                        wait = ?wait,
                        "Window full, waiting"
                    );

                    let event = RateLimiterEvent::WaitStarted {
                        source: self.config.name.clone(),
                        timestamp: std::time::Instant::now(),
                        admitted,
                        limit: self.config.limit,
                        wait,
                    };
                    self.config.event_listeners.emit(&event);

                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {
                            #[cfg(feature = "metrics")]
                            counter!("ratelimiter_calls_total", "ratelimiter" => self.config.name.clone(), "result" => "cancelled")
                                .increment(1);

                            return Err(RateLimitError::Cancelled);
                        }
                        () = sleep_until(expiry) => {}
                    }
                }
            }
        }
    }

    /// Records an admission if the window has room right now.
    ///
    /// Never waits and never queues behind [`acquire`](Self::acquire) callers;
    /// a full window yields [`RateLimitError::WouldWait`] carrying the time
    /// until the next slot frees.
    pub fn try_acquire(&self) -> Result<(), RateLimitError> {
        let outcome = {
            let mut log = self.log.lock().unwrap();
            let now = Instant::now();
            log.prune(now);
            if log.is_full() {
                let retry_after = log
                    .next_expiry()
                    .map(|expiry| expiry.saturating_duration_since(now))
                    .unwrap_or_default();
                Err(RateLimitError::WouldWait { retry_after })
            } else {
                log.record(now);
                Ok(())
            }
        };

        match &outcome {
            Ok(()) => {
                #[cfg(feature = "metrics")]
                counter!("ratelimiter_calls_total", "ratelimiter" => self.config.name.clone(), "result" => "admitted")
                    .increment(1);

                let event = RateLimiterEvent::Admitted {
                    source: self.config.name.clone(),
                    timestamp: std::time::Instant::now(),
                    waited: std::time::Duration::ZERO,
                };
                self.config.event_listeners.emit(&event);
            }
            Err(_) => {
                #[cfg(feature = "metrics")]
                counter!("ratelimiter_calls_total", "ratelimiter" => self.config.name.clone(), "result" => "rejected")
                    .increment(1);
            }
        }

        outcome
    }

    /// Admissions currently inside the window.
    pub fn in_window(&self) -> usize {
        let mut log = self.log.lock().unwrap();
        log.prune(Instant::now());
        log.len()
    }

    /// The configured window capacity.
    pub fn limit(&self) -> usize {
        self.config.limit
    }

    /// The configured window width.
    pub fn window(&self) -> std::time::Duration {
        self.config.window
    }

    /// The configured instance name.
    pub fn name(&self) -> &str {
        &self.config.name
    }
}
