//! A two-region delivery pipeline on one provider budget.
//!
//! The registry hands out one client per region, both dispatch runs share a
//! single rate limiter, and the limiter's sliding window carries over from
//! one run into the next.

use breakwater_core::Fault;
use breakwater_dispatch::{BatchDispatcher, Pacing};
use breakwater_ratelimiter::RateLimiter;
use breakwater_registry::{ClientKey, ClientRegistry, FnFactory};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

struct SmsClient {
    endpoint: String,
    sent: AtomicUsize,
}

#[derive(Debug)]
struct ProvisionError;

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client provisioning failed")
    }
}

impl std::error::Error for ProvisionError {}

#[tokio::test(start_paused = true)]
async fn two_regions_drain_through_one_shared_limiter() {
    let registry = ClientRegistry::new(FnFactory::new(|key: &ClientKey| {
        Ok::<_, ProvisionError>(SmsClient {
            endpoint: format!("https://sms.{}.example.com", key.region()),
            sent: AtomicUsize::new(0),
        })
    }));
    let limiter = Arc::new(
        RateLimiter::builder()
            .limit(14)
            .window(Duration::from_secs(1))
            .name("provider-budget")
            .build(),
    );
    let dispatcher = BatchDispatcher::builder()
        .batch_size(50)
        .pacing(Pacing::PerItem)
        .rate_limiter(limiter)
        .name("delivery")
        .build();
    let cancel = CancellationToken::new();
    let start = Instant::now();

    for region in ["us-east-1", "eu-west-1"] {
        let key = ClientKey::with_default_credentials(region);
        let client = registry.get_or_create(&key).unwrap();
        assert_eq!(client.endpoint, format!("https://sms.{region}.example.com"));

        let messages: Vec<String> = (0..20).map(|n| format!("{region}-msg-{n}")).collect();
        let report = dispatcher
            .dispatch(&cancel, &messages, |_message| {
                let client = Arc::clone(&client);
                async move {
                    client.sent.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), Fault>(())
                }
            })
            .await;

        assert!(report.is_complete_success());
        assert_eq!(report.attempted, 20);
    }

    // 40 sends against 14 per second: the first run drains at t=0 and t=1s,
    // and the second starts against a window already holding six admissions.
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    // Same keys resolve to the same clients, each having sent its region's
    // share.
    assert_eq!(registry.len(), 2);
    for region in ["us-east-1", "eu-west-1"] {
        let key = ClientKey::with_default_credentials(region);
        let client = registry.get_or_create(&key).unwrap();
        assert_eq!(client.sent.load(Ordering::SeqCst), 20);
    }

    registry.dispose_all();
    assert!(registry.is_empty());
}
