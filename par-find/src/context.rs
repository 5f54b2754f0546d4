//! Per-search shared state: the cancellation signal and one progress counter
//! per worker.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

use crate::matcher::Progress;

/// State shared by the workers, the watchdog and the dispatcher of a single
/// search. Created fresh for every search and dropped when it returns.
///
/// Counters are single-writer. Readers other than the owning worker may see
/// stale values while the search runs; after the workers are joined the
/// counts are exact.
#[derive(Debug)]
pub struct SearchContext {
    cancelled: AtomicBool,
    // Padded so neighbouring workers do not share a cache line.
    progress: Box<[CachePadded<AtomicUsize>]>,
}

impl SearchContext {
    pub fn new(workers: usize) -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            progress: (0..workers)
                .map(|_| CachePadded::new(AtomicUsize::new(0)))
                .collect(),
        }
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.progress.len()
    }

    /// Raise the cancellation signal. Setting it twice is harmless.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Last count published by worker `slot`.
    #[inline]
    pub fn published(&self, slot: usize) -> usize {
        self.progress[slot].load(Ordering::Relaxed)
    }

    /// Sum of every worker's published count.
    pub fn total(&self) -> usize {
        self.progress
            .iter()
            .map(|counter| counter.load(Ordering::Relaxed))
            .sum()
    }

    /// Handle through which worker `slot` reports.
    ///
    /// # Panics
    /// Panics if `slot` is not below [`workers`](Self::workers).
    pub fn probe(&self, slot: usize) -> WorkerProbe<'_> {
        assert!(slot < self.workers(), "no progress counter for worker {slot}");
        WorkerProbe { ctx: self, slot }
    }
}

/// One worker's view of the [`SearchContext`].
#[derive(Debug, Clone, Copy)]
pub struct WorkerProbe<'a> {
    ctx: &'a SearchContext,
    slot: usize,
}

impl Progress for WorkerProbe<'_> {
    #[inline(always)]
    fn is_cancelled(&self) -> bool {
        self.ctx.is_cancelled()
    }

    #[inline(always)]
    fn publish(&self, found: usize) {
        self.ctx.progress[self.slot].store(found, Ordering::Relaxed);
    }
}
