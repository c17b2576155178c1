//! Property tests for the rate limiter pattern.
//!
//! Invariants tested:
//! - No stretch of `limit` consecutive admissions fits inside one window
//! - A sequential caller is never parked longer than one window
//! - A cancelled wait leaves the window untouched

use super::paused_runtime;
use breakwater_ratelimiter::RateLimiter;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Property: admissions `limit` apart are always at least one window apart.
    #[test]
    fn window_capacity_is_never_exceeded(
        limit in 1usize..=10,
        total in 1usize..=40,
        window_ms in 50u64..=1000,
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let window = Duration::from_millis(window_ms);
            let limiter = RateLimiter::builder().limit(limit).window(window).build();
            let cancel = CancellationToken::new();

            let mut stamps = Vec::with_capacity(total);
            for _ in 0..total {
                limiter.acquire(&cancel).await.unwrap();
                stamps.push(Instant::now());
            }

            for (i, run) in stamps.windows(limit + 1).enumerate() {
                let spread = run[limit] - run[0];
                prop_assert!(
                    spread >= window,
                    "admissions {} and {} were only {:?} apart with window {:?}",
                    i,
                    i + limit,
                    spread,
                    window
                );
            }

            Ok(())
        })?;
    }

    /// Property: with no competing waiters, one wait never exceeds the window.
    #[test]
    fn a_sequential_caller_waits_at_most_one_window(
        limit in 1usize..=10,
        total in 1usize..=30,
        window_ms in 50u64..=1000,
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let window = Duration::from_millis(window_ms);
            let limiter = RateLimiter::builder().limit(limit).window(window).build();
            let cancel = CancellationToken::new();

            for _ in 0..total {
                let before = Instant::now();
                limiter.acquire(&cancel).await.unwrap();
                let waited = before.elapsed();
                prop_assert!(
                    waited <= window,
                    "waited {:?} with window {:?}",
                    waited,
                    window
                );
            }

            Ok(())
        })?;
    }

    /// Property: cancelling a parked waiter never consumes a slot.
    #[test]
    fn a_cancelled_wait_consumes_no_slot(
        limit in 1usize..=10,
        window_ms in 100u64..=2000,
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let window = Duration::from_millis(window_ms);
            let limiter =
                Arc::new(RateLimiter::builder().limit(limit).window(window).build());
            let cancel = CancellationToken::new();

            for _ in 0..limit {
                limiter.acquire(&cancel).await.unwrap();
            }
            prop_assert_eq!(limiter.in_window(), limit);

            let doomed = CancellationToken::new();
            let waiter = tokio::spawn({
                let limiter = Arc::clone(&limiter);
                let doomed = doomed.clone();
                async move { limiter.acquire(&doomed).await }
            });
            // Let the waiter park against the full window before cancelling.
            tokio::task::yield_now().await;
            doomed.cancel();

            let outcome = waiter.await.unwrap();
            prop_assert!(outcome.is_err());
            prop_assert_eq!(limiter.in_window(), limit);

            Ok(())
        })?;
    }
}
