//! Batch dispatcher stress tests.

use breakwater_core::Fault;
use breakwater_dispatch::BatchDispatcher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::{init_tracing, ConcurrencyTracker};

/// Test: one hundred thousand items in thousand-item batches.
#[tokio::test]
#[ignore]
async fn stress_one_hundred_thousand_items() {
    let dispatcher = BatchDispatcher::builder()
        .batch_size(1000)
        .batch_delay(Duration::ZERO)
        .build();
    let cancel = CancellationToken::new();
    let sent = Arc::new(AtomicUsize::new(0));
    let items: Vec<u32> = (0..100_000).collect();

    let start = Instant::now();
    let report = dispatcher
        .dispatch(&cancel, &items, |_item| {
            let sent = Arc::clone(&sent);
            async move {
                sent.fetch_add(1, Ordering::Relaxed);
                Ok::<(), Fault>(())
            }
        })
        .await;
    let elapsed = start.elapsed();

    println!("100k items in {:?}", elapsed);
    println!(
        "Throughput: {:.0} items/sec",
        100_000.0 / elapsed.as_secs_f64()
    );
    assert!(report.is_complete_success());
    assert_eq!(report.attempted, 100_000);
    assert_eq!(report.batches, 100);
    assert_eq!(sent.load(Ordering::Relaxed), 100_000);
}

/// Test: in-flight concurrency never exceeds the batch size.
#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn stress_concurrency_stays_inside_the_batch() {
    let tracker = ConcurrencyTracker::new();
    let dispatcher = BatchDispatcher::builder()
        .batch_size(500)
        .batch_delay(Duration::ZERO)
        .build();
    let cancel = CancellationToken::new();
    let items: Vec<u32> = (0..5_000).collect();

    let report = dispatcher
        .dispatch(&cancel, &items, |_item| {
            let tracker = Arc::clone(&tracker);
            async move {
                tracker.enter();
                tokio::task::yield_now().await;
                tracker.exit();
                Ok::<(), Fault>(())
            }
        })
        .await;

    println!("Peak concurrency: {}", tracker.peak());
    assert!(report.is_complete_success());
    assert!(tracker.peak() <= 500, "batch boundary leaked: {}", tracker.peak());
    assert!(tracker.peak() > 250, "batch barely overlapped: {}", tracker.peak());
}

/// Test: failure accounting stays exact at volume, with an odd batch size.
#[tokio::test]
#[ignore]
async fn stress_failure_accounting_is_exact() {
    init_tracing();

    let dispatcher = BatchDispatcher::builder()
        .batch_size(997)
        .batch_delay(Duration::ZERO)
        .build();
    let cancel = CancellationToken::new();
    let items: Vec<usize> = (0..50_000).collect();
    let expected_failures = items.iter().filter(|n| *n % 7 == 0).count();

    let report = dispatcher
        .dispatch(&cancel, &items, |n| {
            let rejected = n % 7 == 0;
            async move {
                if rejected {
                    Err(Fault::validation("refused"))
                } else {
                    Ok(())
                }
            }
        })
        .await;

    println!("{report}");
    assert_eq!(report.attempted, 50_000);
    assert_eq!(report.failed, expected_failures);
    assert_eq!(report.succeeded, 50_000 - expected_failures);
    assert_eq!(report.batches, 50_000usize.div_ceil(997));
}
