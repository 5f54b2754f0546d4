//! Orchestration of one parallel search: plan, launch, watch, join, merge.

#![allow(clippy::too_many_arguments)]

use std::io;
use std::panic;
use std::str::FromStr;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Duration;

use log::{debug, trace};

use crate::MatchSet;
use crate::context::SearchContext;
use crate::error::{Result, SearchError};
use crate::matcher::{Matcher, Scalar, Vectorized};
use crate::segment::{Segment, plan_segments};
use crate::watchdog::{self, Watch};
use crate::worker;

/// Worker pool size used by [`parallel_search`].
pub const DEFAULT_WORKERS: usize = 8;

/// Largest worker pool a [`Searcher`] accepts.
pub const MAX_WORKERS: usize = 1024;

/// Watchdog polling period used by [`parallel_search`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Which matcher every worker of a search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Scalar,
    Vectorized,
}

impl TryFrom<u8> for Strategy {
    type Error = SearchError;

    /// `0` selects the scalar matcher, `1` the vectorized one.
    fn try_from(selector: u8) -> Result<Self> {
        match selector {
            0 => Ok(Strategy::Scalar),
            1 => Ok(Strategy::Vectorized),
            other => Err(SearchError::InvalidArgument(format!(
                "unknown strategy selector {other}"
            ))),
        }
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scalar" => Ok(Strategy::Scalar),
            "vector" | "vectorized" => Ok(Strategy::Vectorized),
            other => Err(SearchError::InvalidArgument(format!(
                "unknown strategy {other:?}"
            ))),
        }
    }
}

/// Map the signed threshold convention onto `Option`: any negative `k`
/// means "find everything".
#[inline]
pub fn threshold_from_signed(k: i64) -> Option<usize> {
    usize::try_from(k).ok()
}

// ---------------------------------------------------------------------------
// SearchResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    /// Number of indices returned; never more than the threshold.
    pub count: usize,
    /// Matching indices, strictly ascending.
    pub indices: MatchSet,
    /// The workers found more than the threshold and the surplus was cut.
    pub truncated: bool,
}

// ---------------------------------------------------------------------------
// Searcher
// ---------------------------------------------------------------------------

/// Configuration for parallel searches.
///
/// ```rust
/// use par_find::{Searcher, Strategy};
/// use std::time::Duration;
///
/// let searcher = Searcher::new()
///     .with_workers(4)
///     .with_poll_interval(Duration::from_millis(2));
/// let array = [5, 2, 5, 5, 1, 5];
/// let result = searcher.search(&array, 0, 5, 1, 5, None, Strategy::Scalar).unwrap();
/// assert_eq!(result.indices, vec![0, 2, 3, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct Searcher {
    workers: usize,
    poll_interval: Duration,
}

impl Default for Searcher {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Find the indices in `start, start + step, ...` up to and including
    /// `end` whose element equals `target`, spread over the worker pool.
    ///
    /// With `threshold = Some(k)` a watchdog stops the workers once more than
    /// `k` matches have been published, and the result is cut to the first
    /// `k` of what was gathered. `None` scans everything.
    ///
    /// Arguments are validated before any thread starts. A worker that
    /// panics (e.g. because `end` is out of bounds) re-raises its panic here.
    pub fn search(
        &self,
        array: &[i32],
        start: usize,
        end: usize,
        step: usize,
        target: i32,
        threshold: Option<usize>,
        strategy: Strategy,
    ) -> Result<SearchResult> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(SearchError::InvalidArgument(format!(
                "worker count must be in 1..={MAX_WORKERS}, got {}",
                self.workers
            )));
        }
        match strategy {
            Strategy::Scalar => Scalar::check_step(step)?,
            Strategy::Vectorized => Vectorized::check_step(step)?,
        }

        let segments = plan_segments(start, end, step, self.workers);
        debug!(
            "search for {target} in {start}..={end} step {step}: {strategy:?}, {} workers, threshold {threshold:?}",
            self.workers
        );

        let ctx = SearchContext::new(segments.len());
        let result = match strategy {
            Strategy::Scalar => {
                self.dispatch(&Scalar, array, &segments, target, threshold, &ctx, &admit_all)
            }
            Strategy::Vectorized => {
                self.dispatch(&Vectorized, array, &segments, target, threshold, &ctx, &admit_all)
            }
        }?;

        debug!(
            "search for {target} done: {} matches{}",
            result.count,
            if result.truncated { " (cut short)" } else { "" }
        );
        Ok(result)
    }

    /// Run one search over `segments` using `ctx`.
    ///
    /// `gate` is consulted with the ordinal of every thread about to be
    /// started (the watchdog first, when there is one); an error from it is
    /// treated like a failed spawn.
    fn dispatch<M: Matcher>(
        &self,
        matcher: &M,
        array: &[i32],
        segments: &[Segment],
        target: i32,
        threshold: Option<usize>,
        ctx: &SearchContext,
        gate: &SpawnGate,
    ) -> Result<SearchResult> {
        // the watchdog, when there is one, is started first
        let first_worker = usize::from(threshold.is_some());

        let (buffers, watch) = thread::scope(|s| -> Result<(Vec<MatchSet>, Option<Watch>)> {
            let monitor = match threshold {
                Some(k) => {
                    let interval = self.poll_interval;
                    let handle = spawn_named(s, gate, 0, "par-find-watchdog".into(), move || {
                        watchdog::watch(ctx, k, interval)
                    })?;
                    Some(handle)
                }
                None => None,
            };

            let mut workers = Vec::with_capacity(segments.len());
            for (slot, &segment) in segments.iter().enumerate() {
                let probe = ctx.probe(slot);
                let spawned = spawn_named(
                    s,
                    gate,
                    first_worker + slot,
                    format!("par-find-worker-{slot}"),
                    move || worker::run(matcher, array, segment, target, probe),
                );
                match spawned {
                    Ok(handle) => workers.push(handle),
                    Err(err) => {
                        // The scope still joins whatever did start.
                        release(ctx, monitor.as_ref());
                        return Err(err);
                    }
                }
            }

            let joined: Vec<thread::Result<MatchSet>> =
                workers.into_iter().map(ScopedJoinHandle::join).collect();

            // Covers a watchdog that never tripped.
            release(ctx, monitor.as_ref());

            let mut buffers = Vec::with_capacity(joined.len());
            for outcome in joined {
                buffers.push(outcome.unwrap_or_else(|payload| panic::resume_unwind(payload)));
            }
            let watch = monitor
                .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)));
            Ok((buffers, watch))
        })?;

        if let Some(Watch::Tripped { seen }) = watch {
            trace!("watchdog cut the search short after seeing {seen} matches");
        }

        Ok(merge(buffers, threshold))
    }
}

/// Concatenate per-segment matches in segment order and trim any overshoot.
fn merge(buffers: Vec<MatchSet>, threshold: Option<usize>) -> SearchResult {
    let raw: usize = buffers.iter().map(Vec::len).sum();
    let mut indices = MatchSet::with_capacity(raw);
    for buffer in &buffers {
        indices.extend_from_slice(buffer);
    }

    let truncated = matches!(threshold, Some(k) if raw > k);
    if let Some(k) = threshold {
        indices.truncate(k);
    }
    SearchResult {
        count: indices.len(),
        indices,
        truncated,
    }
}

fn release(ctx: &SearchContext, monitor: Option<&ScopedJoinHandle<'_, Watch>>) {
    ctx.cancel();
    if let Some(handle) = monitor {
        handle.thread().unpark();
    }
}

/// Admission check run before each thread of a search is started.
type SpawnGate = dyn Fn(usize) -> io::Result<()> + Sync;

fn admit_all(_ordinal: usize) -> io::Result<()> {
    Ok(())
}

fn spawn_named<'scope, 'env, T, F>(
    scope: &'scope Scope<'scope, 'env>,
    gate: &SpawnGate,
    ordinal: usize,
    name: String,
    f: F,
) -> Result<ScopedJoinHandle<'scope, T>>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    gate(ordinal)
        .and_then(|()| thread::Builder::new().name(name).spawn_scoped(scope, f))
        .map_err(SearchError::ResourceExhausted)
}

/// [`Searcher::search`] with the default configuration.
pub fn parallel_search(
    array: &[i32],
    start: usize,
    end: usize,
    step: usize,
    target: i32,
    threshold: Option<usize>,
    strategy: Strategy,
) -> Result<SearchResult> {
    Searcher::default().search(array, start, end, step, target, threshold, strategy)
}
