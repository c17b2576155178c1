//! Retry delay schedules.

use std::time::Duration;

/// A precomputed sequence of delays, one per retry.
///
/// The schedule's length caps how many retries run: the first retry sleeps
/// for the first delay, the second for the second, and when the schedule runs
/// out the operation gives up carrying its last fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySchedule {
    delays: Vec<Duration>,
}

impl RetrySchedule {
    /// A schedule that never retries.
    pub fn none() -> Self {
        Self { delays: Vec::new() }
    }

    /// A schedule from explicit per-retry delays.
    pub fn from_delays(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// `retries` delays, all of the same length.
    pub fn fixed(retries: usize, delay: Duration) -> Self {
        Self {
            delays: vec![delay; retries],
        }
    }

    /// `retries` delays doubling from `base`, each capped at `cap`.
    ///
    /// `exponential(3, 500ms, 8s)` yields 500ms, 1s, 2s; with six retries the
    /// tail flattens at the cap: 500ms, 1s, 2s, 4s, 8s, 8s.
    pub fn exponential(retries: usize, base: Duration, cap: Duration) -> Self {
        let mut delays = Vec::with_capacity(retries);
        let mut delay = base;
        for _ in 0..retries {
            delays.push(delay.min(cap));
            delay = delay.saturating_mul(2);
        }
        Self { delays }
    }

    /// Number of retries this schedule allows.
    pub fn retries(&self) -> usize {
        self.delays.len()
    }

    /// Returns `true` if the schedule never retries.
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// Delay before the retry at `index` (0-based), if one remains.
    pub fn delay_for(&self, index: usize) -> Option<Duration> {
        self.delays.get(index).copied()
    }

    /// The delays as a slice.
    pub fn as_slice(&self) -> &[Duration] {
        &self.delays
    }
}
