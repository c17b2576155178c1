//! Expiring read-through cache for breakwater.
//!
//! [`ExpiringCache`] keeps loaded values in a bounded LRU store with a
//! sliding expiration: every hit restarts the entry's idle clock, so a value
//! that keeps getting asked for stays warm, while one nobody touches for the
//! full span is dropped and reloaded on the next request. Lookups go through
//! [`get_or_load`](ExpiringCache::get_or_load), which runs the supplied
//! loader only when the store has nothing live for the key.
//!
//! The loader runs outside the store lock. Two callers racing on the same
//! cold key may therefore both load; the later completion wins the slot.
//! That trade keeps a slow loader on one key from stalling every other key.
//!
//! # Example
//!
//! ```
//! use breakwater_cache::ExpiringCache;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), std::io::Error> {
//! let cache: ExpiringCache<String, String> = ExpiringCache::<String, String>::builder()
//!     .sliding_expiration(Duration::from_secs(1800))
//!     .capacity(64)
//!     .name("welcome-messages")
//!     .build();
//!
//! let message = cache
//!     .get_or_load("tenant-7".to_string(), || async {
//!         // ...fetch the template from the backing store...
//!         Ok::<_, std::io::Error>("Welcome aboard!".to_string())
//!     })
//!     .await?;
//! assert_eq!(message, "Welcome aboard!");
//! # Ok(())
//! # }
//! ```

mod config;
pub mod events;
mod store;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use events::CacheEvent;

use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use store::{Lookup, SlidingStore};
use tokio::time::Instant;

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

#[cfg(feature = "tracing")]
use tracing::debug;

/// A bounded read-through cache with sliding expiration.
pub struct ExpiringCache<K: Hash + Eq + Clone, V: Clone> {
    config: CacheConfig,
    store: Mutex<SlidingStore<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> ExpiringCache<K, V> {
    /// Returns a builder for configuring a cache.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::new()
    }

    pub(crate) fn with_config(config: CacheConfig) -> Self {
        let store = SlidingStore::new(config.capacity, config.sliding_expiration);
        Self {
            config,
            store: Mutex::new(store),
        }
    }

    /// Returns the cached value for `key`, running `loader` if there is none.
    ///
    /// A hit restarts the entry's expiration window and returns a clone. A
    /// miss, or an entry that sat idle past the expiration, runs the loader
    /// and stores its value; loader errors pass straight through and cache
    /// nothing. An expired entry counts as its own outcome, not as a miss,
    /// so the two can be observed separately.
    pub async fn get_or_load<E, Loader, Fut>(&self, key: K, loader: Loader) -> Result<V, E>
    where
        Loader: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let lookup = {
            let mut store = self.store.lock().unwrap();
            store.lookup(&key, Instant::now())
        };

        match lookup {
            Lookup::Hit(value) => {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => self.config.name.clone(), "result" => "hit")
                    .increment(1);

                #[cfg(feature = "tracing")]
                debug!(cache = %self.config.name, "Cache hit");

                let event = CacheEvent::Hit {
                    source: self.config.name.clone(),
                    timestamp: std::time::Instant::now(),
                };
                self.config.event_listeners.emit(&event);

                return Ok(value);
            }
            Lookup::Expired => {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => self.config.name.clone(), "result" => "expired")
                    .increment(1);

                #[cfg(feature = "tracing")]
                debug!(cache = %self.config.name, "Cache entry expired");

                let event = CacheEvent::Expired {
                    source: self.config.name.clone(),
                    timestamp: std::time::Instant::now(),
                };
                self.config.event_listeners.emit(&event);
            }
            Lookup::Missing => {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => self.config.name.clone(), "result" => "miss")
                    .increment(1);

                #[cfg(feature = "tracing")]
                debug!(cache = %self.config.name, "Cache miss");

                let event = CacheEvent::Miss {
                    source: self.config.name.clone(),
                    timestamp: std::time::Instant::now(),
                };
                self.config.event_listeners.emit(&event);
            }
        }

        // No lock while the loader runs; a racing caller on the same key may
        // load redundantly and the later completion wins the slot.
        let value = loader().await?;

        let (evicted, len) = {
            let mut store = self.store.lock().unwrap();
            let evicted = store.insert(key, value.clone(), Instant::now());
            (evicted, store.len())
        };

        if evicted.is_some() {
            #[cfg(feature = "metrics")]
            counter!("cache_evictions_total", "cache" => self.config.name.clone()).increment(1);

            #[cfg(feature = "tracing")]
            debug!(cache = %self.config.name, "Capacity eviction");

            let event = CacheEvent::Evicted {
                source: self.config.name.clone(),
                timestamp: std::time::Instant::now(),
            };
            self.config.event_listeners.emit(&event);
        }

        #[cfg(feature = "metrics")]
        gauge!("cache_size", "cache" => self.config.name.clone()).set(len as f64);
        #[cfg(not(feature = "metrics"))]
        let _ = len;

        Ok(value)
    }

    /// Drops the entry for `key`, if any, returning whether one was there.
    pub fn invalidate(&self, key: &K) -> bool {
        let (removed, len) = {
            let mut store = self.store.lock().unwrap();
            let removed = store.remove(key);
            (removed, store.len())
        };

        #[cfg(feature = "metrics")]
        gauge!("cache_size", "cache" => self.config.name.clone()).set(len as f64);
        #[cfg(not(feature = "metrics"))]
        let _ = len;

        removed
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.store.lock().unwrap().clear();

        #[cfg(feature = "metrics")]
        gauge!("cache_size", "cache" => self.config.name.clone()).set(0.0);
    }

    /// Entries currently held, counting expired ones not yet reaped.
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    /// Whether the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured idle span after which an entry expires.
    pub fn sliding_expiration(&self) -> std::time::Duration {
        self.config.sliding_expiration
    }

    /// The configured maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.config.capacity.get()
    }

    /// The configured instance name.
    pub fn name(&self) -> &str {
        &self.config.name
    }
}
