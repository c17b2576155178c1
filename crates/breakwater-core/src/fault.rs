//! Failure taxonomy shared by every breakwater pattern.
//!
//! Outbound operations report failures as a [`Fault`]: a tagged value carrying
//! a broad [`FaultClass`] plus human-readable detail. Retry policies decide
//! whether to try again by mapping the class (never the message alone) to a
//! [`FailureKind`].

use std::error::Error as StdError;
use std::fmt;

/// Whether a failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The failure may clear on its own; a later attempt can succeed.
    Transient,
    /// The failure will repeat no matter how many times the operation runs.
    Permanent,
}

/// Broad category of an outbound-operation failure.
///
/// The class is assigned where the failure is observed (the client adapter,
/// the transport, the serializer) so that retry decisions downstream never
/// have to parse error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    /// Connection reset, DNS failure, broken pipe.
    Network,
    /// The operation ran out of time.
    Timeout,
    /// The remote side shed load (HTTP 503 and friends).
    Overloaded,
    /// The remote side asked us to slow down (HTTP 429 and friends).
    Throttled,
    /// Credentials rejected or expired.
    Auth,
    /// The request was understood and refused.
    Validation,
    /// The addressed resource does not exist.
    NotFound,
    /// The payload itself cannot be processed.
    MalformedInput,
    /// Anything the adapter could not place in a sharper bucket.
    Other,
}

impl FaultClass {
    /// Canonical retry classification for this class.
    ///
    /// Policies may override this per class (see the retry crate) but the
    /// canonical mapping is the one documented here: infrastructure trouble
    /// is transient, everything the caller did wrong is permanent.
    pub fn kind(self) -> FailureKind {
        match self {
            FaultClass::Network
            | FaultClass::Timeout
            | FaultClass::Overloaded
            | FaultClass::Throttled => FailureKind::Transient,
            FaultClass::Auth
            | FaultClass::Validation
            | FaultClass::NotFound
            | FaultClass::MalformedInput
            | FaultClass::Other => FailureKind::Permanent,
        }
    }

    /// Stable lowercase label, used in log lines and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            FaultClass::Network => "network",
            FaultClass::Timeout => "timeout",
            FaultClass::Overloaded => "overloaded",
            FaultClass::Throttled => "throttled",
            FaultClass::Auth => "auth",
            FaultClass::Validation => "validation",
            FaultClass::NotFound => "not_found",
            FaultClass::MalformedInput => "malformed_input",
            FaultClass::Other => "other",
        }
    }
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure returned by an outbound operation.
///
/// # Examples
///
/// ```
/// use breakwater_core::{Fault, FaultClass, FailureKind};
///
/// let fault = Fault::throttled("rate exceeded for tenant 7");
/// assert_eq!(fault.class(), FaultClass::Throttled);
/// assert_eq!(fault.kind(), FailureKind::Transient);
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{class} fault: {message}")]
pub struct Fault {
    class: FaultClass,
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Fault {
    /// Creates a fault with the given class and detail message.
    pub fn new(class: FaultClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a fault wrapping the error that caused it.
    pub fn with_source(
        class: FaultClass,
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            class,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Shorthand for a [`FaultClass::Network`] fault.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FaultClass::Network, message)
    }

    /// Shorthand for a [`FaultClass::Timeout`] fault.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FaultClass::Timeout, message)
    }

    /// Shorthand for a [`FaultClass::Overloaded`] fault.
    pub fn overloaded(message: impl Into<String>) -> Self {
        Self::new(FaultClass::Overloaded, message)
    }

    /// Shorthand for a [`FaultClass::Throttled`] fault.
    pub fn throttled(message: impl Into<String>) -> Self {
        Self::new(FaultClass::Throttled, message)
    }

    /// Shorthand for a [`FaultClass::Auth`] fault.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(FaultClass::Auth, message)
    }

    /// Shorthand for a [`FaultClass::Validation`] fault.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FaultClass::Validation, message)
    }

    /// Shorthand for a [`FaultClass::NotFound`] fault.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FaultClass::NotFound, message)
    }

    /// Shorthand for a [`FaultClass::MalformedInput`] fault.
    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::new(FaultClass::MalformedInput, message)
    }

    /// Shorthand for a [`FaultClass::Other`] fault.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FaultClass::Other, message)
    }

    /// The broad category of this fault.
    pub fn class(&self) -> FaultClass {
        self.class
    }

    /// Canonical retry classification, delegated to [`FaultClass::kind`].
    pub fn kind(&self) -> FailureKind {
        self.class.kind()
    }

    /// Returns `true` if the canonical classification is transient.
    pub fn is_transient(&self) -> bool {
        self.kind() == FailureKind::Transient
    }

    /// The human-readable detail message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
