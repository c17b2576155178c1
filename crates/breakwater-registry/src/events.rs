use crate::key::ClientKey;
use breakwater_core::events::PatternEvent;
use std::time::Instant;

/// Events emitted by the client registry.
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// A client was built for a key seen for the first time.
    ClientCreated {
        source: String,
        timestamp: Instant,
        key: ClientKey,
    },
    /// A lookup was served by a client already in the registry.
    ClientReused {
        source: String,
        timestamp: Instant,
        key: ClientKey,
    },
    /// The factory failed to tear down a client during disposal.
    DisposeFailed {
        source: String,
        timestamp: Instant,
        key: ClientKey,
        error: String,
    },
    /// The registry was disposed and its clients released.
    Disposed {
        source: String,
        timestamp: Instant,
        clients: usize,
    },
}

impl PatternEvent for RegistryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RegistryEvent::ClientCreated { .. } => "ClientCreated",
            RegistryEvent::ClientReused { .. } => "ClientReused",
            RegistryEvent::DisposeFailed { .. } => "DisposeFailed",
            RegistryEvent::Disposed { .. } => "Disposed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RegistryEvent::ClientCreated { timestamp, .. }
            | RegistryEvent::ClientReused { timestamp, .. }
            | RegistryEvent::DisposeFailed { timestamp, .. }
            | RegistryEvent::Disposed { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            RegistryEvent::ClientCreated { source, .. }
            | RegistryEvent::ClientReused { source, .. }
            | RegistryEvent::DisposeFailed { source, .. }
            | RegistryEvent::Disposed { source, .. } => source,
        }
    }
}
