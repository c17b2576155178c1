use crate::events::CacheEvent;
use crate::ExpiringCache;
use breakwater_core::events::{EventListeners, FnListener};
use breakwater_core::Settings;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Configuration for the expiring cache.
pub struct CacheConfig {
    pub(crate) sliding_expiration: Duration,
    pub(crate) capacity: NonZeroUsize,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
    pub(crate) name: String,
}

/// Builder for [`ExpiringCache`].
pub struct CacheConfigBuilder {
    sliding_expiration: Duration,
    capacity: usize,
    event_listeners: EventListeners<CacheEvent>,
    name: String,
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheConfigBuilder {
    /// Creates a new builder with defaults.
    ///
    /// Defaults:
    /// - sliding_expiration: 30 minutes
    /// - capacity: 256 entries
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            sliding_expiration: Duration::from_secs(30 * 60),
            capacity: 256,
            event_listeners: EventListeners::new(),
            name: "<unnamed>".to_string(),
        }
    }

    /// Creates a builder preloaded from shared [`Settings`].
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .sliding_expiration(settings.cache_sliding_expiration)
            .capacity(settings.cache_capacity)
    }

    /// Sets how long an entry may sit untouched before it expires.
    ///
    /// Every successful lookup restarts the clock.
    pub fn sliding_expiration(mut self, expiration: Duration) -> Self {
        self.sliding_expiration = expiration;
        self
    }

    /// Sets the maximum number of entries held at once.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the name for this cache instance (used in events and logs).
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback for cache hits.
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, CacheEvent::Hit { .. }) {
                f();
            }
        }));
        self
    }

    /// Registers a callback for cache misses.
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, CacheEvent::Miss { .. }) {
                f();
            }
        }));
        self
    }

    /// Registers a callback for lookups that found an expired entry.
    pub fn on_expired<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, CacheEvent::Expired { .. }) {
                f();
            }
        }));
        self
    }

    /// Registers a callback for capacity evictions.
    pub fn on_evicted<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, CacheEvent::Evicted { .. }) {
                f();
            }
        }));
        self
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero.
    pub fn build<K, V>(self) -> ExpiringCache<K, V>
    where
        K: Hash + Eq + Clone,
        V: Clone,
    {
        let capacity =
            NonZeroUsize::new(self.capacity).expect("cache capacity must be at least 1");

        let config = CacheConfig {
            sliding_expiration: self.sliding_expiration,
            capacity,
            event_listeners: self.event_listeners,
            name: self.name,
        };

        ExpiringCache::with_config(config)
    }
}
