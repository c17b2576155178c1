use breakwater_core::events::PatternEvent;
use std::time::Instant;

/// Events emitted by the expiring cache.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// A lookup found a live entry and restarted its expiration window.
    Hit { source: String, timestamp: Instant },
    /// A lookup found nothing and the loader ran.
    Miss { source: String, timestamp: Instant },
    /// A lookup found an entry that had sat idle past its expiration; the
    /// entry was dropped and the loader ran.
    Expired { source: String, timestamp: Instant },
    /// The capacity bound pushed out the coldest entry to make room.
    Evicted { source: String, timestamp: Instant },
}

impl PatternEvent for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "Hit",
            CacheEvent::Miss { .. } => "Miss",
            CacheEvent::Expired { .. } => "Expired",
            CacheEvent::Evicted { .. } => "Evicted",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { timestamp, .. }
            | CacheEvent::Miss { timestamp, .. }
            | CacheEvent::Expired { timestamp, .. }
            | CacheEvent::Evicted { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            CacheEvent::Hit { source, .. }
            | CacheEvent::Miss { source, .. }
            | CacheEvent::Expired { source, .. }
            | CacheEvent::Evicted { source, .. } => source,
        }
    }
}
