//! Batch dispatcher for breakwater.
//!
//! [`BatchDispatcher`] walks a slice of work items in bounded batches:
//! batches run one after another with a configurable pause between them,
//! while the items inside a batch run concurrently. Each item gets its own
//! retry envelope, so one item failing permanently never takes its batch
//! down with it, and a shared [`RateLimiter`] can meter either whole
//! batches or individual items (see [`Pacing`]).
//!
//! The run produces a [`DispatchReport`] instead of an error: partial
//! success is the normal operating mode for bulk work, and the caller
//! decides what to do with the failed remainder.
//!
//! # Example
//!
//! ```
//! use breakwater_core::Fault;
//! use breakwater_dispatch::BatchDispatcher;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = BatchDispatcher::builder()
//!     .batch_size(25)
//!     .name("queue-sends")
//!     .build();
//!
//! let cancel = CancellationToken::new();
//! let messages: Vec<String> = (0..10).map(|n| format!("m-{n}")).collect();
//! let sent = Arc::new(AtomicUsize::new(0));
//!
//! let report = dispatcher
//!     .dispatch(&cancel, &messages, |_message| {
//!         let sent = Arc::clone(&sent);
//!         async move {
//!             // ...hand the message to the provider here...
//!             sent.fetch_add(1, Ordering::SeqCst);
//!             Ok::<(), Fault>(())
//!         }
//!     })
//!     .await;
//!
//! assert!(report.is_complete_success());
//! assert_eq!(sent.load(Ordering::SeqCst), 10);
//! # }
//! ```

mod config;
pub mod events;
mod report;

pub use config::{DispatcherConfig, DispatcherConfigBuilder, Pacing};
pub use events::DispatchEvent;
pub use report::DispatchReport;

use breakwater_core::Fault;
use breakwater_ratelimiter::RateLimiter;
use breakwater_retry::RetryExecutor;
use futures::future::join_all;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "metrics")]
use metrics::counter;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Dispatches a slice of items in sequential, bounded batches.
///
/// Built from [`DispatcherConfigBuilder`]; the builder wires in the optional
/// rate limiter and the per-item retry policy.
pub struct BatchDispatcher {
    config: DispatcherConfig,
    limiter: Option<Arc<RateLimiter>>,
    retry: RetryExecutor,
}

impl BatchDispatcher {
    /// Returns a builder for configuring a dispatcher.
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::new()
    }

    pub(crate) fn with_parts(
        config: DispatcherConfig,
        limiter: Option<Arc<RateLimiter>>,
        retry: RetryExecutor,
    ) -> Self {
        Self {
            config,
            limiter,
            retry,
        }
    }

    /// Runs `operation` once per item, in batches, and reports what happened.
    ///
    /// Batches run strictly one after another, separated by the configured
    /// batch delay; the items inside a batch run concurrently, each wrapped
    /// in the configured retry policy. An item counts as succeeded only when
    /// its final attempt returned `Ok`.
    ///
    /// Cancellation is observed between batches: cancelling the token lets
    /// the in-flight batch settle (pending retry waits abort and count as
    /// failed), then no further batches start and the report comes back with
    /// [`cancelled`](DispatchReport::cancelled) set.
    ///
    /// A panicking item tears down its whole batch. The batch's accounting
    /// is gone at that point, so every item the batch carried counts as
    /// failed and the run moves on to the next batch.
    pub async fn dispatch<I, Op, Fut>(
        &self,
        cancel: &CancellationToken,
        items: &[I],
        operation: Op,
    ) -> DispatchReport
    where
        Op: Fn(&I) -> Fut,
        Fut: Future<Output = Result<(), Fault>>,
    {
        let mut report = DispatchReport::default();
        let total = items.len().div_ceil(self.config.batch_size);

        for (index, batch) in items.chunks(self.config.batch_size).enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            if self.config.pacing == Pacing::PerBatch {
                if let Some(limiter) = &self.limiter {
                    if limiter.acquire(cancel).await.is_err() {
                        report.cancelled = true;
                        break;
                    }
                }
            }

            report.batches += 1;
            report.attempted += batch.len();

            match AssertUnwindSafe(self.run_batch(cancel, batch, &operation))
                .catch_unwind()
                .await
            {
                Ok((succeeded, failed)) => {
                    report.succeeded += succeeded;
                    report.failed += failed;

                    #[cfg(feature = "metrics")]
                    {
                        counter!("dispatch_batches_total", "dispatcher" => self.config.name.clone(), "result" => "completed")
                            .increment(1);
                        counter!("dispatch_items_total", "dispatcher" => self.config.name.clone(), "result" => "succeeded")
                            .increment(succeeded as u64);
                        counter!("dispatch_items_total", "dispatcher" => self.config.name.clone(), "result" => "failed")
                            .increment(failed as u64);
                    }

                    #[cfg(feature = "tracing")]
                    debug!(
                        dispatcher = %self.config.name,
                        index,
                        succeeded,
                        failed,
                        "Batch completed"
                    );

                    let event = DispatchEvent::BatchCompleted {
                        source: self.config.name.clone(),
                        timestamp: std::time::Instant::now(),
                        index,
                        attempted: batch.len(),
                        succeeded,
                        failed,
                    };
                    self.config.event_listeners.emit(&event);
                }
                Err(_) => {
                    report.failed += batch.len();

                    #[cfg(feature = "metrics")]
                    {
                        counter!("dispatch_batches_total", "dispatcher" => self.config.name.clone(), "result" => "panicked")
                            .increment(1);
                        counter!("dispatch_items_total", "dispatcher" => self.config.name.clone(), "result" => "failed")
                            .increment(batch.len() as u64);
                    }

                    #[cfg(feature = "tracing")]
                    warn!(
                        dispatcher = %self.config.name,
                        index,
                        items = batch.len(),
                        "Batch panicked, counting every item as failed"
                    );

                    let event = DispatchEvent::BatchPanicked {
                        source: self.config.name.clone(),
                        timestamp: std::time::Instant::now(),
                        index,
                        items: batch.len(),
                    };
                    self.config.event_listeners.emit(&event);
                }
            }

            if index + 1 < total {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    () = sleep(self.config.batch_delay) => {}
                }
            }
        }

        #[cfg(feature = "metrics")]
        {
            let result = if report.cancelled {
                "cancelled"
            } else if report.failed == 0 {
                "success"
            } else {
                "partial"
            };
            counter!("dispatch_runs_total", "dispatcher" => self.config.name.clone(), "result" => result)
                .increment(1);
        }

        #[cfg(feature = "tracing")]
        debug!(dispatcher = %self.config.name, %report, "Dispatch finished");

        let event = DispatchEvent::Completed {
            source: self.config.name.clone(),
            timestamp: std::time::Instant::now(),
            report,
        };
        self.config.event_listeners.emit(&event);

        report
    }

    /// Runs one batch to completion, returning `(succeeded, failed)`.
    async fn run_batch<I, Op, Fut>(
        &self,
        cancel: &CancellationToken,
        batch: &[I],
        operation: &Op,
    ) -> (usize, usize)
    where
        Op: Fn(&I) -> Fut,
        Fut: Future<Output = Result<(), Fault>>,
    {
        let outcomes = join_all(
            batch
                .iter()
                .map(|item| self.run_item(cancel, item, operation)),
        )
        .await;

        let succeeded = outcomes.iter().filter(|delivered| **delivered).count();
        (succeeded, outcomes.len() - succeeded)
    }

    async fn run_item<I, Op, Fut>(
        &self,
        cancel: &CancellationToken,
        item: &I,
        operation: &Op,
    ) -> bool
    where
        Op: Fn(&I) -> Fut,
        Fut: Future<Output = Result<(), Fault>>,
    {
        if self.config.pacing == Pacing::PerItem {
            if let Some(limiter) = &self.limiter {
                if limiter.acquire(cancel).await.is_err() {
                    return false;
                }
            }
        }

        self.retry.execute(cancel, || operation(item)).await.is_ok()
    }

    /// The effective number of items per batch.
    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    /// The pause between consecutive batches.
    pub fn batch_delay(&self) -> std::time::Duration {
        self.config.batch_delay
    }

    /// Which unit of work spends a rate-limiter slot.
    pub fn pacing(&self) -> Pacing {
        self.config.pacing
    }

    /// The configured instance name.
    pub fn name(&self) -> &str {
        &self.config.name
    }
}
