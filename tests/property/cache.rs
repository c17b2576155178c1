//! Property tests for the expiring cache.
//!
//! Invariants tested:
//! - Resident entries never exceed the configured capacity
//! - Lookup outcomes conserve: hits + misses + expirations = lookups, and
//!   every miss or expiration is exactly one loader run

use super::paused_runtime;
use breakwater_cache::ExpiringCache;
use proptest::prelude::*;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Property: the store never holds more entries than its capacity.
    #[test]
    fn resident_entries_never_exceed_capacity(
        capacity in 1usize..=8,
        keys in prop::collection::vec(0u8..=15, 1..=60),
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let cache: ExpiringCache<u8, u8> = ExpiringCache::<u8, u8>::builder()
                .sliding_expiration(Duration::from_secs(3600))
                .capacity(capacity)
                .build();

            for key in keys {
                let value = cache
                    .get_or_load(key, || async move { Ok::<u8, Infallible>(key) })
                    .await
                    .unwrap();
                prop_assert_eq!(value, key);
                prop_assert!(cache.len() <= capacity);
            }

            Ok(())
        })?;
    }

    /// Property: every lookup is exactly one of hit, miss or expired, and
    /// the loader runs once per miss or expiration.
    #[test]
    fn lookup_outcomes_conserve(
        script in prop::collection::vec((0u8..=5, 0u64..=1500), 1..=60),
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let hits = Arc::new(AtomicUsize::new(0));
            let misses = Arc::new(AtomicUsize::new(0));
            let expirations = Arc::new(AtomicUsize::new(0));
            let loads = Arc::new(AtomicUsize::new(0));

            let hits_seen = Arc::clone(&hits);
            let misses_seen = Arc::clone(&misses);
            let expirations_seen = Arc::clone(&expirations);
            let cache: ExpiringCache<u8, u8> = ExpiringCache::<u8, u8>::builder()
                .sliding_expiration(Duration::from_secs(1))
                .capacity(8)
                .on_hit(move || {
                    hits_seen.fetch_add(1, Ordering::SeqCst);
                })
                .on_miss(move || {
                    misses_seen.fetch_add(1, Ordering::SeqCst);
                })
                .on_expired(move || {
                    expirations_seen.fetch_add(1, Ordering::SeqCst);
                })
                .build();

            let lookups = script.len();
            for (key, idle_ms) in script {
                tokio::time::advance(Duration::from_millis(idle_ms)).await;
                let loads = Arc::clone(&loads);
                cache
                    .get_or_load(key, || async move {
                        loads.fetch_add(1, Ordering::SeqCst);
                        Ok::<u8, Infallible>(key)
                    })
                    .await
                    .unwrap();
            }

            let hits = hits.load(Ordering::SeqCst);
            let misses = misses.load(Ordering::SeqCst);
            let expirations = expirations.load(Ordering::SeqCst);
            prop_assert_eq!(hits + misses + expirations, lookups);
            prop_assert_eq!(loads.load(Ordering::SeqCst), misses + expirations);

            Ok(())
        })?;
    }
}
