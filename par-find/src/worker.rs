//! One scanning thread's body.

use log::trace;

use crate::MatchSet;
use crate::context::WorkerProbe;
use crate::matcher::{Matcher, Progress};
use crate::segment::Segment;

/// Scan `segment` with `matcher`, reporting through `probe`.
///
/// Returns whatever was found before the segment ran out or the search was
/// cancelled. An empty segment does no work.
pub fn run<M: Matcher>(
    matcher: &M,
    array: &[i32],
    segment: Segment,
    target: i32,
    probe: WorkerProbe<'_>,
) -> MatchSet {
    let mut found = MatchSet::new();
    if segment.is_empty() {
        return found;
    }

    matcher.scan(array, segment, target, &mut found, &probe);

    if probe.is_cancelled() {
        trace!(
            "worker on {}..{} stopped with {} matches",
            segment.start,
            segment.end,
            found.len()
        );
    }
    found
}
