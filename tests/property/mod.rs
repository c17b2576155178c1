//! Property-based tests for breakwater patterns.
//!
//! Timing-sensitive properties run on a paused-clock runtime from
//! [`paused_runtime`], so generated delays cost nothing in wall time and
//! every timing assertion is exact.

pub mod cache;
pub mod rate_limiter;
pub mod retry;

/// Current-thread runtime with the clock paused from the start.
pub(crate) fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}
