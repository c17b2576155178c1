use crate::report::DispatchReport;
use breakwater_core::events::PatternEvent;
use std::time::Instant;

/// Events emitted by the batch dispatcher.
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// A batch ran to completion (every item settled).
    BatchCompleted {
        source: String,
        timestamp: Instant,
        /// 0-based batch index within the dispatch.
        index: usize,
        attempted: usize,
        succeeded: usize,
        failed: usize,
    },
    /// A batch was torn down by a panicking item.
    BatchPanicked {
        source: String,
        timestamp: Instant,
        /// 0-based batch index within the dispatch.
        index: usize,
        /// Items the batch carried; all counted failed.
        items: usize,
    },
    /// The dispatch run finished, normally or by cancellation.
    Completed {
        source: String,
        timestamp: Instant,
        report: DispatchReport,
    },
}

impl PatternEvent for DispatchEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DispatchEvent::BatchCompleted { .. } => "BatchCompleted",
            DispatchEvent::BatchPanicked { .. } => "BatchPanicked",
            DispatchEvent::Completed { .. } => "Completed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            DispatchEvent::BatchCompleted { timestamp, .. }
            | DispatchEvent::BatchPanicked { timestamp, .. }
            | DispatchEvent::Completed { timestamp, .. } => *timestamp,
        }
    }

    fn source(&self) -> &str {
        match self {
            DispatchEvent::BatchCompleted { source, .. }
            | DispatchEvent::BatchPanicked { source, .. }
            | DispatchEvent::Completed { source, .. } => source,
        }
    }
}
