//! Error types for the retry executor.

use breakwater_core::Fault;

/// Errors returned by [`RetryExecutor::execute`](crate::RetryExecutor::execute).
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    /// The cancellation token fired before an attempt started or while
    /// waiting between attempts.
    #[error("operation cancelled")]
    Cancelled,
    /// The last fault was classified permanent; no further attempt was made.
    #[error("permanent failure after {attempts} attempt(s)")]
    Permanent {
        /// Attempts completed before giving up.
        attempts: usize,
        /// The fault that ended the operation.
        #[source]
        fault: Fault,
    },
    /// Every scheduled retry was spent on transient faults.
    #[error("retries exhausted after {attempts} attempt(s)")]
    Exhausted {
        /// Attempts completed before giving up.
        attempts: usize,
        /// The fault from the final attempt.
        #[source]
        fault: Fault,
    },
}

impl RetryError {
    /// The fault that ended the operation, when one exists.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            RetryError::Cancelled => None,
            RetryError::Permanent { fault, .. } | RetryError::Exhausted { fault, .. } => {
                Some(fault)
            }
        }
    }

    /// Consumes the error, yielding the terminal fault when one exists.
    pub fn into_fault(self) -> Option<Fault> {
        match self {
            RetryError::Cancelled => None,
            RetryError::Permanent { fault, .. } | RetryError::Exhausted { fault, .. } => {
                Some(fault)
            }
        }
    }

    /// Attempts completed before the operation ended, when any ran.
    pub fn attempts(&self) -> Option<usize> {
        match self {
            RetryError::Cancelled => None,
            RetryError::Permanent { attempts, .. } | RetryError::Exhausted { attempts, .. } => {
                Some(*attempts)
            }
        }
    }

    /// Returns `true` if the operation was abandoned due to cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled)
    }
}
