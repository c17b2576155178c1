//! Failure classification policies.
//!
//! A classifier decides whether a [`Fault`] is worth retrying. The canonical
//! mapping lives on [`FaultClass::kind`]; the functions here are the named
//! policies the executor presets use, and any `Fn(&Fault) -> FailureKind`
//! can stand in where a sharper decision is needed.

use breakwater_core::{FailureKind, Fault, FaultClass};
use std::sync::Arc;

/// Shared classifier function.
pub type Classifier = Arc<dyn Fn(&Fault) -> FailureKind + Send + Sync>;

/// Canonical classification: the fault's class alone decides.
pub fn canonical(fault: &Fault) -> FailureKind {
    fault.kind()
}

/// Broad classification for interactive single operations.
///
/// Extends the canonical mapping in one direction: an `Other` fault whose
/// message carries a throttling signal is treated as transient. Some remote
/// sides surface throttling through generic errors where the text is the
/// only evidence.
pub fn single_operation(fault: &Fault) -> FailureKind {
    match fault.class() {
        FaultClass::Other if mentions_throttling(fault.message()) => FailureKind::Transient,
        class => class.kind(),
    }
}

/// Narrow classification for bulk operations.
///
/// Exactly the canonical mapping, and deliberately so: message text is never
/// consulted, because a malformed item whose error text happens to mention a
/// rate limit must not burn retries for its whole batch.
pub fn bulk_operation(fault: &Fault) -> FailureKind {
    fault.kind()
}

fn mentions_throttling(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["throttl", "rate exceeded", "too many requests", "slow down"]
        .iter()
        .any(|needle| message.contains(needle))
}
