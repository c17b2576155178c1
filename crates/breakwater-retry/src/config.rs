use crate::classify::{self, Classifier};
use crate::events::RetryEvent;
use crate::schedule::RetrySchedule;
use breakwater_core::events::{EventListeners, FnListener};
use breakwater_core::{FailureKind, Fault, FaultClass, Settings};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the retry executor.
///
/// Built through [`builder`](RetryPolicy::builder) or one of the presets;
/// see [`single_operation`](RetryPolicy::single_operation) and
/// [`bulk_operation`](RetryPolicy::bulk_operation).
pub struct RetryPolicy {
    pub(crate) schedule: RetrySchedule,
    pub(crate) classifier: Classifier,
    pub(crate) attempt_timeout: Option<Duration>,
    pub(crate) jitter: f64,
    pub(crate) event_listeners: EventListeners<RetryEvent>,
    pub(crate) name: String,
}

impl RetryPolicy {
    /// Returns a builder for configuring a policy from scratch.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Preset for interactive single operations.
    ///
    /// Five retries doubling from 500ms and capped at 8s, a 60s budget per
    /// attempt, and the broad [`classify::single_operation`] policy that also
    /// sniffs throttling signals out of `Other` fault messages.
    pub fn single_operation() -> Self {
        RetryPolicyBuilder::new()
            .name("single-operation")
            .schedule(RetrySchedule::exponential(
                5,
                Duration::from_millis(500),
                Duration::from_secs(8),
            ))
            .classify(classify::single_operation)
            .attempt_timeout(Duration::from_secs(60))
            .build()
    }

    /// Preset for operations running inside a bulk dispatch.
    ///
    /// Two retries doubling from 2s and capped at 30s, a 60s budget per
    /// attempt, and the narrow [`classify::bulk_operation`] policy that never
    /// consults message text. A batch should spend its time on the many, not
    /// on one stubborn item.
    pub fn bulk_operation() -> Self {
        RetryPolicyBuilder::new()
            .name("bulk-operation")
            .schedule(RetrySchedule::exponential(
                2,
                Duration::from_secs(2),
                Duration::from_secs(30),
            ))
            .classify(classify::bulk_operation)
            .attempt_timeout(Duration::from_secs(60))
            .build()
    }

    /// Builds a policy from shared [`Settings`].
    ///
    /// Picks up `max_retries`, `retry_base_delay`, `retry_max_delay` and
    /// `timeout_per_operation`, with the canonical classifier.
    pub fn from_settings(settings: &Settings) -> Self {
        RetryPolicyBuilder::new()
            .schedule(RetrySchedule::exponential(
                settings.max_retries,
                settings.retry_base_delay,
                settings.retry_max_delay,
            ))
            .attempt_timeout(settings.timeout_per_operation)
            .build()
    }

    /// The delay schedule this policy runs.
    pub fn schedule(&self) -> &RetrySchedule {
        &self.schedule
    }

    /// The configured instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spreads a scheduled delay by the configured jitter factor.
    pub(crate) fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter <= 0.0 {
            return delay;
        }
        let spread = delay.as_secs_f64() * self.jitter;
        let offset = rand::rng().random_range(-spread..=spread);
        Duration::from_secs_f64((delay.as_secs_f64() + offset).max(0.0))
    }
}

/// Builder for [`RetryPolicy`].
pub struct RetryPolicyBuilder {
    schedule: RetrySchedule,
    classifier: Classifier,
    attempt_timeout: Option<Duration>,
    jitter: f64,
    event_listeners: EventListeners<RetryEvent>,
    name: String,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicyBuilder {
    /// Creates a new builder with defaults.
    ///
    /// Defaults:
    /// - schedule: 3 retries doubling from 500ms, capped at 8s
    /// - classifier: canonical ([`FaultClass::kind`])
    /// - attempt_timeout: 60 seconds
    /// - jitter: 0.0
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            schedule: RetrySchedule::exponential(
                3,
                Duration::from_millis(500),
                Duration::from_secs(8),
            ),
            classifier: Arc::new(classify::canonical),
            attempt_timeout: Some(Duration::from_secs(60)),
            jitter: 0.0,
            event_listeners: EventListeners::new(),
            name: "<unnamed>".to_string(),
        }
    }

    /// Sets the delay schedule.
    pub fn schedule(mut self, schedule: RetrySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets the classifier deciding which faults are retried.
    pub fn classify<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&Fault) -> FailureKind + Send + Sync + 'static,
    {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Sets the wall-clock budget for a single attempt.
    ///
    /// An attempt that overruns is abandoned and recorded as a transient
    /// timeout fault, so it competes for retries like any other transient
    /// failure.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Removes the per-attempt budget; attempts run as long as they like.
    pub fn no_attempt_timeout(mut self) -> Self {
        self.attempt_timeout = None;
        self
    }

    /// Sets the jitter factor applied to every scheduled delay.
    ///
    /// A factor of 0.25 spreads each delay by ±25%. Values are clamped to
    /// `0.0..=1.0`.
    pub fn jitter(mut self, factor: f64) -> Self {
        self.jitter = factor.clamp(0.0, 1.0);
        self
    }

    /// Sets the name for this policy instance (used in events and logs).
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback before each retry sleep.
    ///
    /// # Callback Signature
    /// `Fn(usize, Duration)` - Called with the 1-based retry number and the
    /// delay about to be slept.
    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RetryEvent::Retry { attempt, delay, .. } = event {
                f(*attempt, *delay);
            }
        }));
        self
    }

    /// Registers a callback when the operation succeeds.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - Called with the number of attempts the success took.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RetryEvent::Success { attempts, .. } = event {
                f(*attempts);
            }
        }));
        self
    }

    /// Registers a callback when every scheduled retry has been spent.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - Called with the number of attempts that ran.
    pub fn on_exhausted<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RetryEvent::Exhausted { attempts, .. } = event {
                f(*attempts);
            }
        }));
        self
    }

    /// Registers a callback when a fault is classified permanent.
    ///
    /// # Callback Signature
    /// `Fn(FaultClass)` - Called with the class of the rejected fault.
    pub fn on_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn(FaultClass) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RetryEvent::Rejected { class, .. } = event {
                f(*class);
            }
        }));
        self
    }

    /// Builds the policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            schedule: self.schedule,
            classifier: self.classifier,
            attempt_timeout: self.attempt_timeout,
            jitter: self.jitter,
            event_listeners: self.event_listeners,
            name: self.name,
        }
    }
}
