//! Client-side resilience toolkit for talking to rate-limited providers.
//!
//! `breakwater` collects the patterns a delivery pipeline needs between its
//! own queue and a remote API: reuse one client per destination, keep the
//! send rate inside the provider's window, retry what is worth retrying,
//! walk large jobs in bounded batches, and cache slow-loading values. Each
//! pattern is available as an individual crate and as a feature here.
//!
//! # Patterns
//!
//! - **Registry** (`registry` feature): One client per credential/region
//!   pair, built on first use and released by explicit disposal
//! - **Rate limiter** (`ratelimiter` feature): Sliding-window admission
//!   control that waits cooperatively instead of rejecting
//! - **Retry** (`retry` feature): Exponential backoff with jitter, driven by
//!   fault classification rather than error text
//! - **Dispatch** (`dispatch` feature): Sequential bounded batches with
//!   concurrent items and per-item failure isolation
//! - **Cache** (`cache` feature): Read-through store whose entries expire
//!   after sitting idle
//!
//! # Usage
//!
//! Enable specific patterns via features:
//!
//! ```toml
//! [dependencies]
//! breakwater = { version = "0.1", features = ["ratelimiter", "dispatch"] }
//! ```
//!
//! Or enable all patterns:
//!
//! ```toml
//! [dependencies]
//! breakwater = { version = "0.1", features = ["full"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "ratelimiter", feature = "dispatch"))]
//! # {
//! use breakwater::dispatch::{BatchDispatcher, Pacing};
//! use breakwater::ratelimiter::RateLimiter;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! // One limiter shared by everything that talks to the provider.
//! let limiter = Arc::new(
//!     RateLimiter::builder()
//!         .limit(14)
//!         .window(Duration::from_secs(1))
//!         .name("provider-sends")
//!         .build(),
//! );
//!
//! // The dispatcher spends one admission per item it sends.
//! let dispatcher = BatchDispatcher::builder()
//!     .batch_size(50)
//!     .pacing(Pacing::PerItem)
//!     .rate_limiter(limiter)
//!     .name("campaign-sends")
//!     .build();
//! # }
//! ```
//!
//! # Individual Crates
//!
//! Each pattern is also available as a standalone crate for minimal
//! dependencies:
//!
//! - `breakwater-registry`
//! - `breakwater-ratelimiter`
//! - `breakwater-retry`
//! - `breakwater-dispatch`
//! - `breakwater-cache`
//! - `breakwater-core` (shared infrastructure)

// Re-export core (always available)
pub use breakwater_core as core;

// Re-export patterns based on features
#[cfg(feature = "registry")]
pub use breakwater_registry as registry;

#[cfg(feature = "ratelimiter")]
pub use breakwater_ratelimiter as ratelimiter;

#[cfg(feature = "retry")]
pub use breakwater_retry as retry;

#[cfg(feature = "dispatch")]
pub use breakwater_dispatch as dispatch;

#[cfg(feature = "cache")]
pub use breakwater_cache as cache;
