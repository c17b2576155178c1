//! Client registry stress tests.

use breakwater_registry::{ClientKey, ClientRegistry, FnFactory};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
struct NeverFails;

impl fmt::Display for NeverFails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "factory failure")
    }
}

impl std::error::Error for NeverFails {}

/// Test: ten thousand destinations, each built once, all disposed once.
#[test]
#[ignore]
fn stress_ten_thousand_destinations() {
    let created = Arc::new(AtomicUsize::new(0));
    let created_in_factory = Arc::clone(&created);
    let registry = ClientRegistry::new(FnFactory::new(move |key: &ClientKey| {
        created_in_factory.fetch_add(1, Ordering::Relaxed);
        Ok::<String, NeverFails>(key.to_string())
    }));

    let start = Instant::now();
    for i in 0..10_000 {
        let key = ClientKey::with_default_credentials(format!("region-{i}"));
        registry.get_or_create(&key).unwrap();
    }
    let first_pass = start.elapsed();

    // A second pass over the same keys builds nothing new.
    for i in 0..10_000 {
        let key = ClientKey::with_default_credentials(format!("region-{i}"));
        registry.get_or_create(&key).unwrap();
    }
    let both_passes = start.elapsed();

    println!("10k creations in {:?}", first_pass);
    println!("10k cached lookups in {:?}", both_passes - first_pass);
    assert_eq!(created.load(Ordering::Relaxed), 10_000);
    assert_eq!(registry.len(), 10_000);

    registry.dispose_all();
    assert!(registry.is_empty());
}

/// Test: heavy cross-thread contention still builds one client per key.
#[test]
#[ignore]
fn stress_contended_lookups_share_one_client() {
    let created = Arc::new(AtomicUsize::new(0));
    let created_in_factory = Arc::clone(&created);
    let registry = ClientRegistry::new(FnFactory::new(move |key: &ClientKey| {
        created_in_factory.fetch_add(1, Ordering::Relaxed);
        // Widen the race window so a double-build would actually show up.
        std::thread::sleep(std::time::Duration::from_millis(1));
        Ok::<String, NeverFails>(key.to_string())
    }));

    let key = ClientKey::new("burst", "us-east-1");
    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..10_000 {
                    let client = registry.get_or_create(&key).unwrap();
                    assert_eq!(*client, "burst@us-east-1");
                }
            });
        }
    });

    println!("80k contended lookups, {} creation(s)", created.load(Ordering::Relaxed));
    assert_eq!(created.load(Ordering::Relaxed), 1);
    assert_eq!(registry.len(), 1);
}
