//! Retry executor for breakwater.
//!
//! [`RetryExecutor`] runs a fallible async operation under a [`RetryPolicy`]:
//! each failure arrives as a classified [`Fault`], the policy's classifier
//! decides whether it is worth another attempt, and the delay schedule says
//! how long to sleep before that attempt. Permanent faults fail immediately;
//! transient ones are retried until the schedule runs out.
//!
//! Two presets cover the common cases: [`RetryPolicy::single_operation`] for
//! interactive calls (patient, broad classification) and
//! [`RetryPolicy::bulk_operation`] for items inside a batch (stingy, narrow
//! classification).
//!
//! # Example
//!
//! ```
//! use breakwater_core::Fault;
//! use breakwater_retry::RetryExecutor;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let executor = RetryExecutor::single_operation();
//! let cancel = CancellationToken::new();
//! let calls = AtomicUsize::new(0);
//!
//! let value = executor
//!     .execute(&cancel, || async {
//!         if calls.fetch_add(1, Ordering::SeqCst) == 0 {
//!             Err(Fault::network("connection reset"))
//!         } else {
//!             Ok(42)
//!         }
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(value, 42);
//! # }
//! ```

pub mod classify;
mod config;
mod error;
pub mod events;
mod schedule;

pub use classify::Classifier;
pub use config::{RetryPolicy, RetryPolicyBuilder};
pub use error::RetryError;
pub use events::RetryEvent;
pub use schedule::RetrySchedule;

use breakwater_core::{FailureKind, Fault};
use std::future::Future;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "metrics")]
use metrics::counter;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Runs operations under a [`RetryPolicy`].
///
/// The executor is cheap to share behind an `Arc` and holds no per-operation
/// state; every [`execute`](Self::execute) call tracks its own attempts.
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Creates an executor running the given policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Executor preset for interactive single operations.
    pub fn single_operation() -> Self {
        Self::new(RetryPolicy::single_operation())
    }

    /// Executor preset for items inside a bulk dispatch.
    pub fn bulk_operation() -> Self {
        Self::new(RetryPolicy::bulk_operation())
    }

    /// The policy this executor runs.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `operation` until it succeeds, fails permanently, exhausts the
    /// schedule, or is cancelled.
    ///
    /// The operation is an `FnMut` closure returning a fresh future per
    /// attempt, so it can carry mutable state across attempts (sequence
    /// numbers, partial progress). Cancellation is honored before each
    /// attempt and during retry sleeps; an attempt already in flight runs to
    /// its own completion or to the per-attempt timeout, whichever comes
    /// first.
    pub async fn execute<T, Op, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: Op,
    ) -> Result<T, RetryError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Fault>>,
    {
        let policy = &self.policy;
        let mut attempts = 0usize;

        loop {
            if cancel.is_cancelled() {
                #[cfg(feature = "metrics")]
                counter!("retry_operations_total", "retry" => policy.name.clone(), "outcome" => "cancelled")
                    .increment(1);

                return Err(RetryError::Cancelled);
            }

            let outcome = match policy.attempt_timeout {
                Some(limit) => match tokio::time::timeout(limit, operation()).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(Fault::timeout(format!("attempt exceeded {limit:?}"))),
                },
                None => operation().await,
            };
            attempts += 1;

            let fault = match outcome {
                Ok(value) => {
                    #[cfg(feature = "metrics")]
                    counter!("retry_operations_total", "retry" => policy.name.clone(), "outcome" => "success")
                        .increment(1);

                    #[cfg(feature = "tracing")]
                    debug!(retry = %policy.name, attempts, "Operation succeeded");

                    let event = RetryEvent::Success {
                        source: policy.name.clone(),
                        timestamp: std::time::Instant::now(),
                        attempts,
                    };
                    policy.event_listeners.emit(&event);

                    return Ok(value);
                }
                Err(fault) => fault,
            };

            if (policy.classifier)(&fault) == FailureKind::Permanent {
                #[cfg(feature = "metrics")]
                counter!("retry_operations_total", "retry" => policy.name.clone(), "outcome" => "rejected")
                    .increment(1);

                #[cfg(feature = "tracing")]
                debug!(retry = %policy.name, class = %fault.class(), "Permanent fault, not retrying");

                let event = RetryEvent::Rejected {
                    source: policy.name.clone(),
                    timestamp: std::time::Instant::now(),
                    class: fault.class(),
                };
                policy.event_listeners.emit(&event);

                return Err(RetryError::Permanent { attempts, fault });
            }

            let Some(delay) = policy.schedule.delay_for(attempts - 1) else {
                #[cfg(feature = "metrics")]
                counter!("retry_operations_total", "retry" => policy.name.clone(), "outcome" => "exhausted")
                    .increment(1);

                #[cfg(feature = "tracing")]
                warn!(retry = %policy.name, attempts, class = %fault.class(), "Retries exhausted");

                let event = RetryEvent::Exhausted {
                    source: policy.name.clone(),
                    timestamp: std::time::Instant::now(),
                    attempts,
                };
                policy.event_listeners.emit(&event);

                return Err(RetryError::Exhausted { attempts, fault });
            };
            let delay = policy.jittered(delay);

            #[cfg(feature = "metrics")]
            counter!("retry_attempts_total", "retry" => policy.name.clone()).increment(1);

            #[cfg(feature = "tracing")]
            debug!(
                retry = %policy.name,
                attempt = attempts,
                delay = ?delay,
                class = %fault.class(),
                "Transient fault, retrying"
            );

            let event = RetryEvent::Retry {
                source: policy.name.clone(),
                timestamp: std::time::Instant::now(),
                attempt: attempts,
                delay,
                class: fault.class(),
            };
            policy.event_listeners.emit(&event);

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    #[cfg(feature = "metrics")]
                    counter!("retry_operations_total", "retry" => policy.name.clone(), "outcome" => "cancelled")
                        .increment(1);

                    return Err(RetryError::Cancelled);
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}
