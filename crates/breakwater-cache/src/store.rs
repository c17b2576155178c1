//! Sliding-expiration storage over a bounded LRU map.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

/// Entry with its last-access stamp.
#[derive(Clone, Debug)]
struct SlidingEntry<V> {
    value: V,
    touched: Instant,
}

impl<V> SlidingEntry<V> {
    fn new(value: V, now: Instant) -> Self {
        Self { value, touched: now }
    }

    /// An entry untouched for the full expiration span is gone; the
    /// boundary instant itself already counts as expired.
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.touched) >= ttl
    }

    fn touch(&mut self, now: Instant) {
        self.touched = now;
    }
}

/// Outcome of a single store lookup.
#[derive(Debug, PartialEq)]
pub(crate) enum Lookup<V> {
    /// A live entry; its expiration window was restarted.
    Hit(V),
    /// An entry existed but sat idle too long; it has been dropped.
    Expired,
    Missing,
}

/// Bounded LRU store where every access restarts an entry's expiration.
///
/// Expired entries are reaped lazily, on the lookup that finds them stale,
/// so [`len`](Self::len) can briefly overcount until the next access.
pub(crate) struct SlidingStore<K: Hash + Eq, V> {
    entries: LruCache<K, SlidingEntry<V>>,
    ttl: Duration,
}

impl<K: Hash + Eq + Clone, V: Clone> SlidingStore<K, V> {
    pub(crate) fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Looks up `key`, reaping it if it expired and refreshing it if not.
    pub(crate) fn lookup(&mut self, key: &K, now: Instant) -> Lookup<V> {
        let expired = match self.entries.peek(key) {
            Some(entry) => entry.is_expired(self.ttl, now),
            None => return Lookup::Missing,
        };

        if expired {
            self.entries.pop(key);
            return Lookup::Expired;
        }

        // Live entry: promote it in LRU order and restart its window.
        let Some(entry) = self.entries.get_mut(key) else {
            return Lookup::Missing;
        };
        entry.touch(now);
        Lookup::Hit(entry.value.clone())
    }

    /// Stores `value` under `key`, returning the key of any entry the
    /// capacity bound pushed out. Replacing an existing key is not an
    /// eviction and returns `None`.
    pub(crate) fn insert(&mut self, key: K, value: V, now: Instant) -> Option<K> {
        let entry = SlidingEntry::new(value, now);
        match self.entries.push(key.clone(), entry) {
            Some((displaced, _)) if displaced != key => Some(displaced),
            _ => None,
        }
    }

    pub(crate) fn remove(&mut self, key: &K) -> bool {
        self.entries.pop(key).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
