//! Expiring cache metrics regression tests

use super::helpers::*;
use serial_test::serial;

use breakwater_cache::ExpiringCache;
use std::convert::Infallible;
use std::time::Duration;

#[tokio::test(start_paused = true)]
#[serial]
async fn cache_metrics_exist() {
    init_recorder();

    let cache: ExpiringCache<&str, String> = ExpiringCache::<&str, String>::builder()
        .name("metrics_cache")
        .sliding_expiration(Duration::from_millis(50))
        .capacity(4)
        .build();

    // Miss, hit, then an expired lookup after the idle span elapses.
    cache
        .get_or_load("a", || async { Ok::<_, Infallible>("one".to_string()) })
        .await
        .unwrap();
    cache
        .get_or_load("a", || async { Ok::<_, Infallible>("one".to_string()) })
        .await
        .unwrap();
    tokio::time::advance(Duration::from_millis(50)).await;
    cache
        .get_or_load("a", || async { Ok::<_, Infallible>("two".to_string()) })
        .await
        .unwrap();

    assert_counter_exists("cache_requests_total");
    assert_metric_has_label("cache_requests_total", "cache", "metrics_cache");
    assert_metric_has_label("cache_requests_total", "result", "miss");
    assert_metric_has_label("cache_requests_total", "result", "hit");
    assert_metric_has_label("cache_requests_total", "result", "expired");

    assert_gauge_exists("cache_size");
    assert_metric_has_label("cache_size", "cache", "metrics_cache");
}

#[tokio::test]
#[serial]
async fn cache_eviction_metrics() {
    init_recorder();

    let cache: ExpiringCache<u32, u32> = ExpiringCache::<u32, u32>::builder()
        .name("crowded_cache")
        .sliding_expiration(Duration::from_secs(60))
        .capacity(1)
        .build();

    cache
        .get_or_load(1, || async { Ok::<_, Infallible>(1) })
        .await
        .unwrap();
    cache
        .get_or_load(2, || async { Ok::<_, Infallible>(2) })
        .await
        .unwrap();

    assert_counter_exists("cache_evictions_total");
    assert_metric_has_label("cache_evictions_total", "cache", "crowded_cache");
}
