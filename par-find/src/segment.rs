//! Splitting a strided index range into one contiguous block per worker.

use log::trace;

/// A strided, half-open slice `[start, end)` of the search space.
///
/// The indices visited are `start, start + step, ...` while below `end`.
/// `start >= end` means there is nothing to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl Segment {
    /// Build a segment from the inclusive `start..=end` convention used by the
    /// public entry points. `start > end` yields an empty segment.
    #[inline]
    pub fn inclusive(start: usize, end: usize, step: usize) -> Self {
        if start > end {
            return Self { start, end: start, step };
        }
        Self {
            start,
            end: end.saturating_add(1),
            step,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of stride origins in the segment.
    #[inline]
    pub fn strides(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - 1 - self.start) / self.step + 1
        }
    }

    /// The stride origins, in ascending order.
    #[inline]
    pub fn origins(&self) -> impl Iterator<Item = usize> {
        (self.start..self.end).step_by(self.step)
    }
}

/// Divide the inclusive range `start..=end` into exactly `workers` segments.
///
/// The `M` stride origins of the range are cut into contiguous blocks at
/// `t * M / workers`, so block sizes differ by at most one and the later
/// blocks absorb the remainder. When `M < workers` some segments are empty.
/// Each segment ends where the next one begins, clipped to `end`, so a
/// vector block starting at a segment's last origin never reads past it.
///
/// # Panics
/// Panics if `step` or `workers` is zero.
pub fn plan_segments(start: usize, end: usize, step: usize, workers: usize) -> Vec<Segment> {
    assert!(step > 0, "step must be positive");
    assert!(workers > 0, "at least one worker is required");

    let range = Segment::inclusive(start, end, step);
    let strides = range.strides();

    let segments: Vec<Segment> = (0..workers)
        .map(|t| {
            let lo = block_boundary(t, strides, workers);
            let hi = block_boundary(t + 1, strides, workers);
            let seg_start = start + lo * step;
            let seg_end = if lo == hi {
                seg_start
            } else if hi == strides {
                range.end
            } else {
                start + hi * step
            };
            Segment {
                start: seg_start,
                end: seg_end,
                step,
            }
        })
        .collect();

    trace!(
        "planned {} segments over {} strides of {}: {:?}",
        workers, strides, step, segments
    );
    segments
}

/// `t * strides / workers` without overflowing the product.
#[inline]
fn block_boundary(t: usize, strides: usize, workers: usize) -> usize {
    (t as u128 * strides as u128 / workers as u128) as usize
}
