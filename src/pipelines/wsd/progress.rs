//! Shared progress counter.
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Number of processed articles, shared by all workers.
///
/// Only used for reporting: nothing depends on its value for correctness.
#[derive(Debug, Clone)]
pub struct Progress {
    count: Arc<AtomicU64>,
    start: Instant,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicU64::new(0)),
            start: Instant::now(),
        }
    }

    /// Count one more article, returning the new total.
    pub fn incr(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Mean wall time per article since start, across all workers.
    pub fn mean_per_article(&self) -> Duration {
        match self.get() {
            0 => Duration::ZERO,
            n => self.elapsed().div_f64(n as f64),
        }
    }
}
