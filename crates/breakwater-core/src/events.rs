//! Listener plumbing shared by every pattern crate.
//!
//! Each pattern defines its own event enum (admissions, retries, cache
//! expirations) and implements [`PatternEvent`] for it; builders register
//! callbacks through [`EventListeners`] via their `on_*` hooks. Emission is
//! synchronous and panic-isolated, so a bad callback costs its own
//! notification and nothing else.

use std::fmt;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Implemented by every pattern's event enum.
pub trait PatternEvent: Send + Sync + fmt::Debug {
    /// Short machine-readable tag for the variant, e.g. `"Admitted"`.
    fn event_type(&self) -> &'static str;

    /// The instant the event was recorded.
    fn timestamp(&self) -> Instant;

    /// Name of the pattern instance that emitted the event.
    fn source(&self) -> &str;
}

/// An observer of one pattern's events.
pub trait EventListener<E: PatternEvent>: Send + Sync {
    fn on_event(&self, event: &E);
}

/// Wraps a plain closure as an [`EventListener`].
pub struct FnListener<E, F>(F, PhantomData<fn(&E)>);

impl<E, F> FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f, PhantomData)
    }
}

impl<E, F> EventListener<E> for FnListener<E, F>
where
    E: PatternEvent,
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        (self.0)(event)
    }
}

/// The set of listeners attached to one pattern instance.
pub struct EventListeners<E: PatternEvent> {
    listeners: Vec<Arc<dyn EventListener<E>>>,
}

impl<E: PatternEvent> EventListeners<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener. Listeners are notified in registration order.
    pub fn add<L>(&mut self, listener: L)
    where
        L: EventListener<E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Notifies every registered listener.
    ///
    /// A panicking listener is unwound and skipped; the rest still run and
    /// the emitting pattern never sees the panic.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let _ = catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: PatternEvent> Clone for EventListeners<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E: PatternEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}
