use std::fmt;

/// Aggregate outcome of a [`dispatch`](crate::BatchDispatcher::dispatch) run.
///
/// Counts cover only batches that actually started; a dispatch halted by
/// cancellation reports what it completed and sets
/// [`cancelled`](Self::cancelled).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Items in batches that started.
    pub attempted: usize,
    /// Items whose operation ultimately succeeded.
    pub succeeded: usize,
    /// Items that failed permanently, exhausted their retries, panicked with
    /// their batch, or were cancelled mid-flight.
    pub failed: usize,
    /// Batches that started.
    pub batches: usize,
    /// `true` when cancellation stopped the run before all batches started.
    pub cancelled: bool,
}

impl DispatchReport {
    /// Returns `true` when every attempted item succeeded and nothing was
    /// cut short.
    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.failed == 0
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted={} succeeded={} failed={} batches={}{}",
            self.attempted,
            self.succeeded,
            self.failed,
            self.batches,
            if self.cancelled { " cancelled" } else { "" }
        )
    }
}
