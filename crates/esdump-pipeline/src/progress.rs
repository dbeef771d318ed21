//! Shared run counters
//!
//! Workers bump these after every write attempt; a reporter (the CLI progress
//! bar) polls them. Cloning shares the same counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Default)]
struct Counters {
    attempted: AtomicU64,
    failed: AtomicU64,
    total: OnceLock<u64>,
}

/// Attempt and failure counters for one run
#[derive(Debug, Clone, Default)]
pub struct Progress {
    inner: Arc<Counters>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one write attempt, successful or not
    pub fn record_attempt(&self) {
        self.inner.attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.inner.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Expected number of records. Only the first call sticks.
    pub fn set_total(&self, total: u64) {
        let _ = self.inner.total.set(total);
    }

    pub fn attempted(&self) -> u64 {
        self.inner.attempted.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.inner.failed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> Option<u64> {
        self.inner.total.get().copied()
    }
}
