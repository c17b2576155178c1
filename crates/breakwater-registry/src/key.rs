use std::fmt;

/// Identity of a shared client: the credential it authenticates with and the
/// region it talks to.
///
/// Two lookups with equal keys always resolve to the same client instance.
/// The credential component is an opaque label (a profile name, an access key
/// id), never the secret itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    credential: String,
    region: String,
}

impl ClientKey {
    /// Label used when the caller supplies no explicit credentials and the
    /// client resolves them from the ambient environment.
    pub const DEFAULT_CREDENTIAL: &'static str = "default";

    /// Creates a key from an explicit credential label and region.
    pub fn new(credential: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            region: region.into(),
        }
    }

    /// Creates a key for ambient credentials in the given region.
    ///
    /// All such keys share the [`DEFAULT_CREDENTIAL`](Self::DEFAULT_CREDENTIAL)
    /// label, so callers relying on environment-resolved credentials share one
    /// client per region.
    pub fn with_default_credentials(region: impl Into<String>) -> Self {
        Self::new(Self::DEFAULT_CREDENTIAL, region)
    }

    /// The credential label.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// The region name.
    pub fn region(&self) -> &str {
        &self.region
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.credential, self.region)
    }
}
