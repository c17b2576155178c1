use crate::events::RegistryEvent;
use crate::factory::ClientFactory;
use crate::key::ClientKey;
use crate::ClientRegistry;
use breakwater_core::events::{EventListeners, FnListener};

/// Configuration for the client registry.
pub struct RegistryConfig {
    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<RegistryEvent>,
}

/// Builder for [`ClientRegistry`].
pub struct RegistryConfigBuilder {
    name: String,
    event_listeners: EventListeners<RegistryEvent>,
}

impl Default for RegistryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryConfigBuilder {
    /// Creates a new builder with defaults.
    ///
    /// Defaults:
    /// - name: `"<unnamed>"`
    pub fn new() -> Self {
        Self {
            name: "<unnamed>".to_string(),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the name for this registry instance (used in events and logs).
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback when a client is built for a new key.
    ///
    /// # Callback Signature
    /// `Fn(&ClientKey)` - Called with the key the client was built for.
    pub fn on_client_created<F>(mut self, f: F) -> Self
    where
        F: Fn(&ClientKey) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RegistryEvent::ClientCreated { key, .. } = event {
                f(key);
            }
        }));
        self
    }

    /// Registers a callback when a lookup is served by an existing client.
    ///
    /// # Callback Signature
    /// `Fn(&ClientKey)` - Called with the key that was looked up.
    pub fn on_client_reused<F>(mut self, f: F) -> Self
    where
        F: Fn(&ClientKey) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RegistryEvent::ClientReused { key, .. } = event {
                f(key);
            }
        }));
        self
    }

    /// Registers a callback when disposing a client fails.
    ///
    /// Disposal continues past individual failures, so this may fire several
    /// times for a single `dispose_all` call.
    ///
    /// # Callback Signature
    /// `Fn(&ClientKey)` - Called with the key of the client that failed to
    /// dispose.
    pub fn on_dispose_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(&ClientKey) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RegistryEvent::DisposeFailed { key, .. } = event {
                f(key);
            }
        }));
        self
    }

    /// Registers a callback when the registry is disposed.
    ///
    /// # Callback Signature
    /// `Fn(usize)` - Called with the number of clients that were released.
    pub fn on_disposed<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RegistryEvent::Disposed { clients, .. } = event {
                f(*clients);
            }
        }));
        self
    }

    /// Builds the registry around the given factory.
    pub fn build<F: ClientFactory>(self, factory: F) -> ClientRegistry<F> {
        let config = RegistryConfig {
            name: self.name,
            event_listeners: self.event_listeners,
        };

        ClientRegistry::with_config(factory, config)
    }
}
