use crate::key::ClientKey;

/// Builds and tears down the clients a registry hands out.
///
/// `create` runs under the registry's internal lock so that exactly one
/// client per key is ever constructed; it must not block on I/O. Expensive
/// connection setup belongs in the client's own lazy initialization.
pub trait ClientFactory: Send + Sync {
    /// The client type this factory produces.
    type Client: Send + Sync;
    /// The error returned when construction fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds a client for the given key.
    fn create(&self, key: &ClientKey) -> Result<Self::Client, Self::Error>;

    /// Releases resources held by a client during registry disposal.
    ///
    /// The default does nothing, which suits clients that clean up on drop.
    fn dispose(&self, key: &ClientKey, client: &Self::Client) -> Result<(), Self::Error> {
        let _ = (key, client);
        Ok(())
    }
}

/// A function-based client factory.
///
/// Wraps a closure for the common case where disposal needs nothing beyond
/// dropping the client.
pub struct FnFactory<F> {
    f: F,
}

impl<F> FnFactory<F> {
    /// Creates a factory from a construction closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, C, E> ClientFactory for FnFactory<F>
where
    F: Fn(&ClientKey) -> Result<C, E> + Send + Sync,
    C: Send + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    type Client = C;
    type Error = E;

    fn create(&self, key: &ClientKey) -> Result<C, E> {
        (self.f)(key)
    }
}
