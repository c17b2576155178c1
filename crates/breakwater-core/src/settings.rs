//! Shared tuning knobs.
//!
//! [`Settings`] is the one struct an application deserializes from its config
//! file and hands to the pattern builders via their `from_settings`
//! constructors. Every field has a production-tested default, so a config
//! file only needs to name the knobs it wants to move.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning knobs consumed by the breakwater builders.
///
/// Unknown fields in the source document are ignored; missing fields fall
/// back to the defaults documented on each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Admissions allowed per sliding window. Default: 100.
    pub max_requests_per_second: usize,

    /// Width of the rate-limiter sliding window. Default: 1 second.
    pub rate_window: Duration,

    /// Retries after the first attempt before giving up. Default: 3.
    pub max_retries: usize,

    /// Delay before the first retry; doubles on each subsequent retry.
    /// Default: 500 milliseconds.
    pub retry_base_delay: Duration,

    /// Upper bound on the doubled retry delay. Default: 8 seconds.
    pub retry_max_delay: Duration,

    /// Wall-clock budget for a single attempt. Default: 60 seconds.
    pub timeout_per_operation: Duration,

    /// Items per dispatched batch. Default: 50.
    pub batch_size: usize,

    /// Pause between consecutive batches. Default: 100 milliseconds.
    pub batch_delay: Duration,

    /// Idle period after which a cache entry expires. Default: 30 minutes.
    pub cache_sliding_expiration: Duration,

    /// Maximum number of live cache entries. Default: 256.
    pub cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_requests_per_second: 100,
            rate_window: Duration::from_secs(1),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            retry_max_delay: Duration::from_secs(8),
            timeout_per_operation: Duration::from_secs(60),
            batch_size: 50,
            batch_delay: Duration::from_millis(100),
            cache_sliding_expiration: Duration::from_secs(30 * 60),
            cache_capacity: 256,
        }
    }
}
