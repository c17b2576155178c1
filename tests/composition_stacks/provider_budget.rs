//! Provider send quotas enforced through dispatch pacing.

use breakwater_core::Fault;
use breakwater_dispatch::{BatchDispatcher, Pacing};
use breakwater_ratelimiter::RateLimiter;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn fifty_messages_drain_at_fourteen_per_second() {
    let limiter = Arc::new(
        RateLimiter::builder()
            .limit(14)
            .window(Duration::from_secs(1))
            .build(),
    );
    let dispatcher = BatchDispatcher::builder()
        .batch_size(50)
        .pacing(Pacing::PerItem)
        .rate_limiter(limiter)
        .build();
    let cancel = CancellationToken::new();
    let stamps = Arc::new(Mutex::new(Vec::new()));
    let messages: Vec<u32> = (0..50).collect();
    let start = Instant::now();

    let report = dispatcher
        .dispatch(&cancel, &messages, |_message| {
            let stamps = Arc::clone(&stamps);
            async move {
                stamps.lock().unwrap().push(Instant::now());
                Ok::<(), Fault>(())
            }
        })
        .await;

    assert!(report.is_complete_success());
    assert_eq!(report.attempted, 50);
    // Gulps of 14, 14, 14 and 8 across four windows.
    assert_eq!(start.elapsed(), Duration::from_secs(3));

    // No window of the run ever saw more than 14 sends.
    let stamps = stamps.lock().unwrap();
    assert_eq!(stamps.len(), 50);
    for window in stamps.windows(15) {
        assert!(window[14] - window[0] >= Duration::from_secs(1));
    }
}

#[tokio::test(start_paused = true)]
async fn per_batch_pacing_spends_one_admission_per_batch() {
    let limiter = Arc::new(
        RateLimiter::builder()
            .limit(2)
            .window(Duration::from_secs(1))
            .build(),
    );
    let dispatcher = BatchDispatcher::builder()
        .batch_size(10)
        .batch_delay(Duration::ZERO)
        .pacing(Pacing::PerBatch)
        .rate_limiter(limiter)
        .build();
    let cancel = CancellationToken::new();
    let messages: Vec<u32> = (0..50).collect();
    let start = Instant::now();

    let report = dispatcher
        .dispatch(&cancel, &messages, |_message| async { Ok::<(), Fault>(()) })
        .await;

    // Five batches, two admissions per window: starts at t=0, 0, 1s, 1s
    // and 2s. The fifty items inside them are never metered individually.
    assert!(report.is_complete_success());
    assert_eq!(report.batches, 5);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}
