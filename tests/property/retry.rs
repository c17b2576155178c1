//! Property tests for the retry pattern.
//!
//! Invariants tested:
//! - Attempts never exceed the schedule length plus the first try
//! - Time spent retrying is exactly the sum of the scheduled delays
//! - Permanent faults never earn a second attempt

use super::paused_runtime;
use breakwater_core::{Fault, FaultClass};
use breakwater_retry::{RetryError, RetryExecutor, RetryPolicy, RetrySchedule};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn always_failing_executor(schedule: RetrySchedule) -> RetryExecutor {
    RetryExecutor::new(RetryPolicy::builder().schedule(schedule).build())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Property: a never-succeeding operation runs the schedule out exactly.
    #[test]
    fn attempts_never_exceed_the_schedule(
        retries in 0usize..=5,
        delay_ms in 10u64..=1000,
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let executor = always_failing_executor(RetrySchedule::fixed(
                retries,
                Duration::from_millis(delay_ms),
            ));
            let cancel = CancellationToken::new();
            let calls = Arc::new(AtomicUsize::new(0));

            let result: Result<(), RetryError> = executor
                .execute(&cancel, || {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(Fault::network("connection reset"))
                    }
                })
                .await;

            let err = result.unwrap_err();
            prop_assert!(
                matches!(err, RetryError::Exhausted { .. }),
                "expected RetryError::Exhausted"
            );
            prop_assert_eq!(err.attempts(), Some(retries + 1));
            prop_assert_eq!(calls.load(Ordering::SeqCst), retries + 1);

            Ok(())
        })?;
    }

    /// Property: total retry time is the sum of the scheduled delays.
    #[test]
    fn retry_time_is_the_sum_of_the_schedule(
        delays_ms in prop::collection::vec(10u64..=1000, 0..=5),
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let delays: Vec<Duration> =
                delays_ms.iter().copied().map(Duration::from_millis).collect();
            let expected: Duration = delays.iter().sum();
            let executor =
                always_failing_executor(RetrySchedule::from_delays(delays));
            let cancel = CancellationToken::new();
            let start = Instant::now();

            let result: Result<(), RetryError> = executor
                .execute(&cancel, || async {
                    Err(Fault::overloaded("service unavailable"))
                })
                .await;

            prop_assert!(result.is_err());
            prop_assert_eq!(start.elapsed(), expected);

            Ok(())
        })?;
    }

    /// Property: a permanent fault ends the run on the first attempt.
    #[test]
    fn permanent_faults_never_earn_a_retry(
        class in prop_oneof![
            Just(FaultClass::Auth),
            Just(FaultClass::Validation),
            Just(FaultClass::NotFound),
            Just(FaultClass::MalformedInput),
            Just(FaultClass::Other),
        ],
        retries in 1usize..=5,
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let executor = always_failing_executor(RetrySchedule::fixed(
                retries,
                Duration::from_secs(1),
            ));
            let cancel = CancellationToken::new();
            let calls = Arc::new(AtomicUsize::new(0));
            let start = Instant::now();

            let result: Result<(), RetryError> = executor
                .execute(&cancel, || {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err(Fault::new(class, "the request itself is wrong"))
                    }
                })
                .await;

            let err = result.unwrap_err();
            prop_assert!(
                matches!(err, RetryError::Permanent { .. }),
                "expected RetryError::Permanent"
            );
            prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
            prop_assert_eq!(start.elapsed(), Duration::ZERO);

            Ok(())
        })?;
    }
}
