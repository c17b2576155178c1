//! Keyed client registry for breakwater.
//!
//! Outbound clients are expensive to build and internally pooled, so an
//! application wants exactly one per identity. [`ClientRegistry`] hands out
//! shared clients keyed by [`ClientKey`] (credential label plus region),
//! building each lazily on first use and releasing all of them together at
//! shutdown via [`dispose_all`](ClientRegistry::dispose_all).
//!
//! # Features
//!
//! - Exactly-once construction per key, even under concurrent first access
//! - Explicit disposal that keeps going past individual teardown failures
//! - Event hooks for creation and disposal
//!
//! # Example
//!
//! ```
//! use breakwater_registry::{ClientKey, FnFactory, RegistryConfigBuilder};
//! use std::convert::Infallible;
//!
//! struct QueueClient {
//!     endpoint: String,
//! }
//!
//! let registry = RegistryConfigBuilder::new()
//!     .name("queue-clients")
//!     .on_client_created(|key| println!("built client for {key}"))
//!     .build(FnFactory::new(|key: &ClientKey| {
//!         Ok::<_, Infallible>(QueueClient {
//!             endpoint: format!("https://queue.{}.example.com", key.region()),
//!         })
//!     }));
//!
//! let a = registry.get_or_create(&ClientKey::with_default_credentials("eu-west-1")).unwrap();
//! let b = registry.get_or_create(&ClientKey::with_default_credentials("eu-west-1")).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//!
//! registry.dispose_all();
//! ```

mod config;
pub mod events;
mod factory;
mod key;

pub use config::{RegistryConfig, RegistryConfigBuilder};
pub use events::RegistryEvent;
pub use factory::{ClientFactory, FnFactory};
pub use key::ClientKey;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// A registry of shared clients, one per [`ClientKey`].
///
/// Lookups for a key already in the registry return the existing client;
/// the first lookup for a key runs the factory under the registry lock, so
/// concurrent first lookups still build exactly one client.
///
/// The registry has an explicit end of life: after
/// [`dispose_all`](Self::dispose_all) any further lookup panics. Disposal is
/// expected to run once, after in-flight work has drained.
pub struct ClientRegistry<F: ClientFactory> {
    factory: F,
    clients: Mutex<HashMap<ClientKey, Arc<F::Client>>>,
    disposed: AtomicBool,
    config: RegistryConfig,
}

impl<F: ClientFactory> ClientRegistry<F> {
    /// Creates a registry with default configuration.
    pub fn new(factory: F) -> Self {
        Self::builder().build(factory)
    }

    /// Returns a builder for configuring a registry.
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::new()
    }

    pub(crate) fn with_config(factory: F, config: RegistryConfig) -> Self {
        Self {
            factory,
            clients: Mutex::new(HashMap::new()),
            disposed: AtomicBool::new(false),
            config,
        }
    }

    /// Returns the shared client for `key`, building it on first use.
    ///
    /// A factory error is returned to the caller and nothing is stored, so a
    /// later lookup for the same key will try again.
    ///
    /// # Panics
    ///
    /// Panics if called after [`dispose_all`](Self::dispose_all).
    pub fn get_or_create(&self, key: &ClientKey) -> Result<Arc<F::Client>, F::Error> {
        assert!(
            !self.disposed.load(Ordering::Acquire),
            "client registry `{}` used after dispose_all",
            self.config.name
        );

        let (client, built) = {
            let mut clients = self.clients.lock().unwrap();
            match clients.get(key) {
                Some(client) => (Arc::clone(client), None),
                None => {
                    // First caller for this key builds the client; holding the
                    // lock across the factory call makes construction
                    // exactly-once.
                    let client = Arc::new(self.factory.create(key)?);
                    clients.insert(key.clone(), Arc::clone(&client));
                    (client, Some(clients.len()))
                }
            }
        };

        let Some(total) = built else {
            let event = RegistryEvent::ClientReused {
                source: self.config.name.clone(),
                timestamp: Instant::now(),
                key: key.clone(),
            };
            self.config.event_listeners.emit(&event);
            return Ok(client);
        };

        #[cfg(feature = "metrics")]
        {
            counter!("registry_clients_created_total", "registry" => self.config.name.clone())
                .increment(1);
            gauge!("registry_clients", "registry" => self.config.name.clone()).set(total as f64);
        }
        #[cfg(not(feature = "metrics"))]
        let _ = total;

        #[cfg(feature = "tracing")]
        debug!(registry = %self.config.name, key = %key, "Created client");

        let event = RegistryEvent::ClientCreated {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            key: key.clone(),
        };
        self.config.event_listeners.emit(&event);

        Ok(client)
    }

    /// Releases every client in the registry.
    ///
    /// Each client is passed to [`ClientFactory::dispose`]; a failure there is
    /// reported through events and logging but never stops disposal of the
    /// rest. Calling this a second time does nothing.
    pub fn dispose_all(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        let drained: Vec<(ClientKey, Arc<F::Client>)> = {
            let mut clients = self.clients.lock().unwrap();
            clients.drain().collect()
        };

        let released = drained.len();
        for (key, client) in &drained {
            if let Err(error) = self.factory.dispose(key, client) {
                #[cfg(feature = "tracing")]
                warn!(registry = %self.config.name, key = %key, error = %error, "Client disposal failed");

                let event = RegistryEvent::DisposeFailed {
                    source: self.config.name.clone(),
                    timestamp: Instant::now(),
                    key: key.clone(),
                    error: error.to_string(),
                };
                self.config.event_listeners.emit(&event);
            }
        }

        #[cfg(feature = "metrics")]
        gauge!("registry_clients", "registry" => self.config.name.clone()).set(0.0);

        #[cfg(feature = "tracing")]
        info!(registry = %self.config.name, clients = released, "Registry disposed");

        let event = RegistryEvent::Disposed {
            source: self.config.name.clone(),
            timestamp: Instant::now(),
            clients: released,
        };
        self.config.event_listeners.emit(&event);
    }

    /// Returns `true` if a client has already been built for `key`.
    pub fn contains(&self, key: &ClientKey) -> bool {
        self.clients.lock().unwrap().contains_key(key)
    }

    /// Returns the number of live clients.
    pub fn len(&self) -> usize {
        self.clients.lock().unwrap().len()
    }

    /// Returns `true` if no clients have been built yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once [`dispose_all`](Self::dispose_all) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}
