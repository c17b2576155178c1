use crate::events::RateLimiterEvent;
use breakwater_core::events::{EventListeners, FnListener};
use breakwater_core::Settings;
use std::time::Duration;

/// Configuration for the rate limiter.
pub struct RateLimiterConfig {
    pub(crate) limit: usize,
    pub(crate) window: Duration,
    pub(crate) event_listeners: EventListeners<RateLimiterEvent>,
    pub(crate) name: String,
}

/// Builder for [`RateLimiter`](crate::RateLimiter).
pub struct RateLimiterConfigBuilder {
    limit: usize,
    window: Duration,
    event_listeners: EventListeners<RateLimiterEvent>,
    name: String,
}

impl Default for RateLimiterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiterConfigBuilder {
    /// Creates a new builder with defaults.
    ///
    /// Defaults:
    /// - limit: 100
    /// - window: 1 second
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            limit: 100,
            window: Duration::from_secs(1),
            event_listeners: EventListeners::new(),
            name: "<unnamed>".to_string(),
        }
    }

    /// Creates a builder preloaded from shared [`Settings`].
    ///
    /// Picks up `max_requests_per_second` and `rate_window`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .limit(settings.max_requests_per_second)
            .window(settings.rate_window)
    }

    /// Sets the maximum number of admissions per sliding window.
    ///
    /// This is the core rate limiting parameter: a limit of 100 with a one
    /// second window admits at most 100 callers in any one-second span, no
    /// matter how the span is aligned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the width of the sliding window.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Sets the name for this limiter instance (used in events and logs).
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback when a caller is admitted.
    ///
    /// # Callback Signature
    /// `Fn(Duration)` - Called with how long the caller waited for a slot.
    /// Zero when the window had room on arrival.
    pub fn on_admitted<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RateLimiterEvent::Admitted { waited, .. } = event {
                f(*waited);
            }
        }));
        self
    }

    /// Registers a callback when a caller starts waiting for a slot.
    ///
    /// # Callback Signature
    /// `Fn(usize, usize)` - Called with the current number of admissions in
    /// the window and the configured limit.
    pub fn on_wait<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RateLimiterEvent::WaitStarted {
                admitted, limit, ..
            } = event
            {
                f(*admitted, *limit);
            }
        }));
        self
    }

    /// Builds the rate limiter.
    ///
    /// # Panics
    ///
    /// Panics if the limit is zero; a limiter that admits nobody would park
    /// every caller forever.
    pub fn build(self) -> crate::RateLimiter {
        assert!(self.limit > 0, "rate limit must be at least 1");

        let config = RateLimiterConfig {
            limit: self.limit,
            window: self.window,
            event_listeners: self.event_listeners,
            name: self.name,
        };

        crate::RateLimiter::with_config(config)
    }
}
