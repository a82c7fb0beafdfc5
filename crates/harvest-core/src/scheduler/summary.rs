//! Run counters and the end-of-run summary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Shared success/failure counters incremented by workers.
#[derive(Debug, Default)]
pub(super) struct Counters {
    successful: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    pub fn record_success(&self) {
        self.successful.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Read after all workers have joined.
    pub fn load(&self) -> (usize, usize) {
        (
            self.successful.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

/// Outcome of one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Size of the expanded task space.
    pub total: usize,
    /// Tasks filtered out before dispatch (ledger-complete or valid snapshot).
    pub skipped: usize,
    /// Skipped tasks newly marked complete because a valid snapshot existed.
    pub reconciled: usize,
    pub successful: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Tasks handed to workers.
    pub fn dispatched(&self) -> usize {
        self.total - self.skipped
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
