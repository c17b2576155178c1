use crate::events::DispatchEvent;
use crate::report::DispatchReport;
use crate::BatchDispatcher;
use breakwater_core::events::{EventListeners, FnListener};
use breakwater_core::Settings;
use breakwater_ratelimiter::RateLimiter;
use breakwater_retry::{RetryExecutor, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

/// Which unit of work spends a rate-limiter slot.
///
/// The limiter can meter whole batches or individual items; the two differ
/// by a factor of the batch size in how fast items reach the remote side.
/// [`PerBatch`](Pacing::PerBatch) is the default: one admission covers a
/// whole batch, which suits providers that meter API calls rather than
/// payload entries. Choose [`PerItem`](Pacing::PerItem) when the provider
/// counts every entry against the quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// One rate-limiter admission per batch.
    PerBatch,
    /// One rate-limiter admission per item, taken concurrently inside the
    /// batch.
    PerItem,
}

/// Configuration for the batch dispatcher.
pub struct DispatcherConfig {
    pub(crate) batch_size: usize,
    pub(crate) batch_delay: Duration,
    pub(crate) pacing: Pacing,
    pub(crate) event_listeners: EventListeners<DispatchEvent>,
    pub(crate) name: String,
}

/// Builder for [`BatchDispatcher`].
pub struct DispatcherConfigBuilder {
    batch_size: usize,
    provider_cap: Option<usize>,
    batch_delay: Duration,
    pacing: Pacing,
    limiter: Option<Arc<RateLimiter>>,
    retry_policy: Option<RetryPolicy>,
    event_listeners: EventListeners<DispatchEvent>,
    name: String,
}

impl Default for DispatcherConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherConfigBuilder {
    /// Creates a new builder with defaults.
    ///
    /// Defaults:
    /// - batch_size: 50
    /// - batch_delay: 100ms
    /// - pacing: [`Pacing::PerBatch`]
    /// - retry policy: [`RetryPolicy::bulk_operation`]
    /// - no rate limiter
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            batch_size: 50,
            provider_cap: None,
            batch_delay: Duration::from_millis(100),
            pacing: Pacing::PerBatch,
            limiter: None,
            retry_policy: None,
            event_listeners: EventListeners::new(),
            name: "<unnamed>".to_string(),
        }
    }

    /// Creates a builder preloaded from shared [`Settings`].
    ///
    /// Picks up `batch_size` and `batch_delay`; the retry policy and rate
    /// limiter are still wired explicitly.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .batch_size(settings.batch_size)
            .batch_delay(settings.batch_delay)
    }

    /// Sets the number of items per batch.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets a hard ceiling the provider imposes on batch size.
    ///
    /// The effective batch size is the configured size clamped to this cap,
    /// so an operator raising `batch_size` past what the remote API accepts
    /// still gets working batches.
    pub fn provider_cap(mut self, cap: usize) -> Self {
        self.provider_cap = Some(cap);
        self
    }

    /// Sets the pause between consecutive batches.
    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Sets which unit of work spends a rate-limiter slot.
    pub fn pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Shares a rate limiter with the dispatcher.
    ///
    /// Without one, batches run back to back separated only by the batch
    /// delay.
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Sets the retry policy applied to each item.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the name for this dispatcher instance (used in events and logs).
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback when a batch completes.
    ///
    /// # Callback Signature
    /// `Fn(usize, usize, usize)` - Called with the batch's attempted,
    /// succeeded and failed item counts.
    pub fn on_batch_completed<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize, usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let DispatchEvent::BatchCompleted {
                attempted,
                succeeded,
                failed,
                ..
            } = event
            {
                f(*attempted, *succeeded, *failed);
            }
        }));
        self
    }

    /// Registers a callback when a dispatch run finishes.
    ///
    /// # Callback Signature
    /// `Fn(DispatchReport)` - Called with the aggregate report.
    pub fn on_completed<F>(mut self, f: F) -> Self
    where
        F: Fn(DispatchReport) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let DispatchEvent::Completed { report, .. } = event {
                f(*report);
            }
        }));
        self
    }

    /// Builds the dispatcher.
    ///
    /// # Panics
    ///
    /// Panics if the effective batch size (after the provider cap) is zero.
    pub fn build(self) -> BatchDispatcher {
        let batch_size = match self.provider_cap {
            Some(cap) => self.batch_size.min(cap),
            None => self.batch_size,
        };
        assert!(batch_size > 0, "batch size must be at least 1");

        let config = DispatcherConfig {
            batch_size,
            batch_delay: self.batch_delay,
            pacing: self.pacing,
            event_listeners: self.event_listeners,
            name: self.name,
        };
        let retry = RetryExecutor::new(
            self.retry_policy.unwrap_or_else(RetryPolicy::bulk_operation),
        );

        BatchDispatcher::with_parts(config, self.limiter, retry)
    }
}
