//! The two scanning strategies and the single-threaded entry points.

use crate::error::InvalidStep;
use crate::segment::Segment;
use crate::{MatchSet, VECTOR_WIDTH};

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// The hooks a scan reports through while it runs.
///
/// A matcher asks [`is_cancelled`](Self::is_cancelled) before every step
/// (or vector block) and calls [`publish`](Self::publish) with the running
/// match count after appending.
pub trait Progress {
    fn is_cancelled(&self) -> bool;
    fn publish(&self, found: usize);
}

/// Progress sink for a plain single-threaded scan: never cancelled, reports
/// to nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unwatched;

impl Progress for Unwatched {
    #[inline(always)]
    fn is_cancelled(&self) -> bool {
        false
    }

    #[inline(always)]
    fn publish(&self, _found: usize) {}
}

// ---------------------------------------------------------------------------
// Matcher trait
// ---------------------------------------------------------------------------

/// A scanning strategy over one [`Segment`].
///
/// Matches are appended to `found` in ascending index order. A cancelled
/// scan returns early and leaves what it already appended in place.
pub trait Matcher: Sync {
    /// Step granularity the strategy requires.
    const WIDTH: usize;

    /// # Panics
    /// Panics if `segment.step` fails [`check_step`](Self::check_step).
    fn scan<P: Progress>(
        &self,
        array: &[i32],
        segment: Segment,
        target: i32,
        found: &mut MatchSet,
        progress: &P,
    );

    fn check_step(step: usize) -> Result<(), InvalidStep> {
        if step == 0 || step % Self::WIDTH != 0 {
            return Err(InvalidStep {
                step,
                width: Self::WIDTH,
            });
        }
        Ok(())
    }
}

#[inline(always)]
fn assert_step<M: Matcher>(step: usize) {
    if let Err(err) = M::check_step(step) {
        panic!("{err}");
    }
}

/// Element-by-element comparison at every stride origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Matcher for Scalar {
    const WIDTH: usize = 1;

    #[inline]
    fn scan<P: Progress>(
        &self,
        array: &[i32],
        segment: Segment,
        target: i32,
        found: &mut MatchSet,
        progress: &P,
    ) {
        assert_step::<Self>(segment.step);
        for i in segment.origins() {
            if progress.is_cancelled() {
                return;
            }
            if array[i] == target {
                found.push(i);
                progress.publish(found.len());
            }
        }
    }
}

/// Tests [`VECTOR_WIDTH`] contiguous elements at every stride origin with
/// one wide comparison.
///
/// A block that would run past the end of the segment is finished by the
/// scalar path over the lanes that remain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vectorized;

impl Matcher for Vectorized {
    const WIDTH: usize = VECTOR_WIDTH;

    #[inline]
    fn scan<P: Progress>(
        &self,
        array: &[i32],
        segment: Segment,
        target: i32,
        found: &mut MatchSet,
        progress: &P,
    ) {
        assert_step::<Self>(segment.step);
        for origin in segment.origins() {
            if progress.is_cancelled() {
                return;
            }

            let lanes = &array[origin..segment.end.min(origin + VECTOR_WIDTH)];
            let Some(block) = lanes.first_chunk::<VECTOR_WIDTH>() else {
                // --- Scalar epilogue ---
                for (lane, &value) in lanes.iter().enumerate() {
                    if value == target {
                        found.push(origin + lane);
                        progress.publish(found.len());
                    }
                }
                continue;
            };

            // SAFETY: every backend only reads the eight lanes of `block`.
            let mask = unsafe { crate::arch::eq_mask_8x32(block, target) };
            if mask != 0 {
                push_lanes(found, origin, mask);
                progress.publish(found.len());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bitmask decoding
// ---------------------------------------------------------------------------

/// `COUNT_ONES[m]` is the number of set bits in the lane mask `m`.
const COUNT_ONES: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    table
};

/// Append `origin + lane` for every set lane of `mask`, lowest lane first.
#[inline(always)]
fn push_lanes(found: &mut MatchSet, origin: usize, mask: u8) {
    found.reserve(COUNT_ONES[mask as usize] as usize);
    let mut bits = mask;
    while bits != 0 {
        found.push(origin + bits.trailing_zeros() as usize);
        bits &= bits - 1;
    }
}

// ---------------------------------------------------------------------------
// Single-threaded entry points
// ---------------------------------------------------------------------------

/// Every index in `start, start + step, ...` up to and including `end` that
/// holds `target`, ascending. `start > end` is an empty range.
///
/// # Panics
/// Panics if `step` is zero or if the range reaches past `array`; callers
/// must keep `end < array.len()`.
pub fn scalar_search(array: &[i32], start: usize, end: usize, step: usize, target: i32) -> MatchSet {
    assert!(step > 0, "step must be positive");
    let mut found = MatchSet::new();
    Scalar.scan(
        array,
        Segment::inclusive(start, end, step),
        target,
        &mut found,
        &Unwatched,
    );
    found
}

/// Vectorized counterpart of [`scalar_search`].
///
/// At each origin `start, start + step, ...` the [`VECTOR_WIDTH`] elements
/// `origin..=min(origin + VECTOR_WIDTH - 1, end)` are tested, so with
/// `step == VECTOR_WIDTH` the whole range is scanned and the result equals
/// `scalar_search` with a step of one.
///
/// Fails without scanning if `step` is not a positive multiple of
/// [`VECTOR_WIDTH`].
///
/// # Panics
/// Panics if the range reaches past `array`.
pub fn vector_search(
    array: &[i32],
    start: usize,
    end: usize,
    step: usize,
    target: i32,
) -> Result<MatchSet, InvalidStep> {
    Vectorized::check_step(step)?;
    let mut found = MatchSet::new();
    Vectorized.scan(
        array,
        Segment::inclusive(start, end, step),
        target,
        &mut found,
        &Unwatched,
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const SAMPLE: [i32; 6] = [5, 2, 5, 5, 1, 5];

    /// Cancels itself once `limit` matches have been published.
    struct StopAfter {
        limit: usize,
        seen: Cell<usize>,
    }

    impl Progress for StopAfter {
        fn is_cancelled(&self) -> bool {
            self.seen.get() >= self.limit
        }

        fn publish(&self, found: usize) {
            self.seen.set(found);
        }
    }

    fn dense(array: &[i32], target: i32) -> MatchSet {
        array
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == target)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_scalar_sample() {
        assert_eq!(scalar_search(&SAMPLE, 0, 5, 1, 5), vec![0, 2, 3, 5]);
    }

    #[test]
    fn test_scalar_step() {
        assert_eq!(scalar_search(&SAMPLE, 0, 5, 2, 5), vec![0, 2]);
        assert_eq!(scalar_search(&SAMPLE, 1, 5, 2, 5), vec![3, 5]);
    }

    #[test]
    fn test_scalar_empty_range() {
        assert!(scalar_search(&SAMPLE, 4, 3, 1, 5).is_empty());
    }

    #[test]
    fn test_scalar_no_match() {
        assert!(scalar_search(&SAMPLE, 0, 5, 1, 7).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_scalar_out_of_bounds_panics() {
        scalar_search(&SAMPLE, 0, 6, 1, 5);
    }

    #[test]
    fn test_vector_sample_is_all_epilogue() {
        assert_eq!(vector_search(&SAMPLE, 0, 5, 8, 5), Ok(vec![0, 2, 3, 5]));
    }

    #[test]
    fn test_vector_rejects_bad_step() {
        assert_eq!(
            vector_search(&SAMPLE, 0, 5, 3, 5),
            Err(InvalidStep { step: 3, width: 8 })
        );
        assert_eq!(
            vector_search(&SAMPLE, 0, 5, 0, 5),
            Err(InvalidStep { step: 0, width: 8 })
        );
    }

    #[test]
    fn test_vector_matches_scalar_across_blocks() {
        let array: Vec<i32> = (0..53).map(|i| (i * 7 % 5) as i32).collect();
        for target in 0..5 {
            let expected = dense(&array, target);
            assert_eq!(scalar_search(&array, 0, 52, 1, target), expected);
            assert_eq!(vector_search(&array, 0, 52, 8, target), Ok(expected));
        }
    }

    #[test]
    fn test_vector_first_and_last_lane() {
        let mut array = [0i32; 16];
        array[0] = 9;
        array[7] = 9;
        array[8] = 9;
        array[15] = 9;
        assert_eq!(vector_search(&array, 0, 15, 8, 9), Ok(vec![0, 7, 8, 15]));
    }

    #[test]
    fn test_vector_wide_step_tests_one_block_per_origin() {
        let array = [1i32; 40];
        let expected: Vec<usize> = (0..8).chain(16..24).chain(32..40).collect();
        assert_eq!(vector_search(&array, 0, 39, 16, 1), Ok(expected));
    }

    #[test]
    fn test_vector_block_clipped_at_end() {
        let array = [1i32; 20];
        // origins 2, 10: lanes 2..=9 and 10..=12
        let expected: Vec<usize> = (2..=12).collect();
        assert_eq!(vector_search(&array, 2, 12, 8, 1), Ok(expected));
    }

    #[test]
    fn test_vector_empty_range() {
        assert_eq!(vector_search(&SAMPLE, 5, 0, 8, 5), Ok(vec![]));
    }

    #[test]
    fn test_eq_mask_every_lane() {
        for lane in 0..8 {
            let mut block = [0i32; 8];
            block[lane] = -3;
            let mask = unsafe { crate::arch::eq_mask_8x32(&block, -3) };
            assert_eq!(mask, 1 << lane);
        }
        let block = [i32::MIN; 8];
        assert_eq!(unsafe { crate::arch::eq_mask_8x32(&block, i32::MIN) }, 0xff);
        assert_eq!(unsafe { crate::arch::eq_mask_8x32(&block, 0) }, 0);
    }

    #[test]
    fn test_count_ones_table() {
        for m in 0..=255u8 {
            assert_eq!(COUNT_ONES[m as usize] as u32, m.count_ones());
        }
    }

    #[test]
    fn test_push_lanes_ascending() {
        let mut found = vec![1];
        push_lanes(&mut found, 40, 0b1010_0101);
        assert_eq!(found, vec![1, 40, 42, 45, 47]);
    }

    #[test]
    #[should_panic(expected = "step 1 is not a positive multiple of 8")]
    fn test_vector_scan_rejects_unit_step_segment() {
        let mut found = MatchSet::new();
        Vectorized.scan(&[1i32; 16], Segment::inclusive(0, 15, 1), 1, &mut found, &Unwatched);
    }

    #[test]
    #[should_panic(expected = "step 0 is not a positive multiple of 1")]
    fn test_scalar_scan_rejects_zero_step_segment() {
        let segment = Segment {
            start: 0,
            end: 4,
            step: 0,
        };
        Scalar.scan(&[1i32; 4], segment, 1, &mut MatchSet::new(), &Unwatched);
    }

    #[test]
    fn test_vector_scan_ascending_for_valid_steps() {
        let array = [1i32; 50];
        for step in [8, 16, 24] {
            let mut found = MatchSet::new();
            Vectorized.scan(&array, Segment::inclusive(0, 49, step), 1, &mut found, &Unwatched);
            assert!(found.windows(2).all(|w| w[0] < w[1]), "step {step}");
        }
    }

    #[test]
    fn test_scalar_cancel_keeps_prefix() {
        let array = [4i32; 32];
        let progress = StopAfter {
            limit: 3,
            seen: Cell::new(0),
        };
        let mut found = MatchSet::new();
        Scalar.scan(&array, Segment::inclusive(0, 31, 1), 4, &mut found, &progress);
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn test_vector_cancel_checked_per_block() {
        let array = [4i32; 32];
        let progress = StopAfter {
            limit: 3,
            seen: Cell::new(0),
        };
        let mut found = MatchSet::new();
        Vectorized.scan(&array, Segment::inclusive(0, 31, 8), 4, &mut found, &progress);
        // the whole first block lands before the next check
        assert_eq!(found, (0..8).collect::<Vec<_>>());
    }
}
