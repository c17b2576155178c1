use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Sliding log of admission timestamps.
///
/// Holds the instants of every admission still inside the window. An
/// admission ages out once a full window has passed since it was recorded;
/// pruning treats the window as half-open, so an admission aged exactly one
/// window frees its slot. Without that, a full log whose oldest entry sits
/// exactly on the boundary would report a zero wait and never make progress.
#[derive(Debug)]
pub(crate) struct AdmissionLog {
    limit: usize,
    window: Duration,
    admissions: VecDeque<Instant>,
}

impl AdmissionLog {
    pub(crate) fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            admissions: VecDeque::with_capacity(limit),
        }
    }

    /// Drops admissions that have aged out of the window ending at `now`.
    pub(crate) fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.admissions.front() {
            if oldest + self.window <= now {
                self.admissions.pop_front();
            } else {
                break;
            }
        }
    }

    /// Records an admission at `now`.
    pub(crate) fn record(&mut self, now: Instant) {
        self.admissions.push_back(now);
    }

    /// Number of admissions currently inside the window.
    pub(crate) fn len(&self) -> usize {
        self.admissions.len()
    }

    /// Returns `true` when no further admission fits in the window.
    pub(crate) fn is_full(&self) -> bool {
        self.admissions.len() >= self.limit
    }

    /// Instant at which the oldest admission leaves the window.
    pub(crate) fn next_expiry(&self) -> Option<Instant> {
        self.admissions.front().map(|&oldest| oldest + self.window)
    }
}
