//! Decay curve evaluation.
//!
//! Maps the number of blocks elapsed since a fill's target block to the
//! incremental adjustments applied to the amounts:
//!
//! - `fill_increase` is added to the mandate's minimum settlement amount
//! - `claim_decrease` is subtracted from the compact's claimable amount
//!
//! Segments are walked in order. A segment with a non-zero duration covers
//! `[counted, counted + duration)` and interpolates toward the next segment's
//! values. A zero-duration segment is a jump at `counted`: it applies only
//! when `blocks_passed == counted`, and the segment right after it
//! interpolates *from* the jumped-to values using percentage progress.
//!
//! Block-weighted interpolation rounds `fill_increase` up and
//! `claim_decrease` down.

use alloy_primitives::U256;
use tribunal_types::constants::PERCENT_SCALE;
use tribunal_types::{DecaySegment, Result, TribunalError, unpack_curve};

/// Adjustments produced by a decay curve at a given block offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecayAdjustment {
    pub fill_increase: U256,
    pub claim_decrease: U256,
}

impl DecayAdjustment {
    #[must_use]
    pub fn new(fill_increase: U256, claim_decrease: U256) -> Self {
        Self {
            fill_increase,
            claim_decrease,
        }
    }

    fn of(segment: &DecaySegment) -> Self {
        Self::new(
            U256::from(segment.fill_increase()),
            U256::from(segment.claim_decrease()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rounding {
    Up,
    Down,
}

/// Evaluate a curve of packed segment words.
pub fn evaluate_curve(curve: &[U256], blocks_passed: u64) -> Result<DecayAdjustment> {
    evaluate_segments(&unpack_curve(curve), blocks_passed)
}

/// Evaluate a curve of unpacked segments.
///
/// # Errors
/// Returns [`TribunalError::DecayBlocksExceeded`] if `blocks_passed` lies at
/// or beyond the end of the curve (and is not the offset of a trailing jump).
pub fn evaluate_segments(
    segments: &[DecaySegment],
    blocks_passed: u64,
) -> Result<DecayAdjustment> {
    if segments.is_empty() {
        return Ok(DecayAdjustment::default());
    }

    let mut blocks_counted: u64 = 0;

    for (i, segment) in segments.iter().enumerate() {
        let duration = u64::from(segment.block_duration());

        if duration == 0 {
            if blocks_passed == blocks_counted {
                return Ok(DecayAdjustment::of(segment));
            }
            continue;
        }

        let segment_end = blocks_counted + duration;
        if blocks_passed < segment_end {
            let elapsed = blocks_passed - blocks_counted;

            let preceding_jump = i
                .checked_sub(1)
                .map(|p| &segments[p])
                .filter(|p| p.is_instant());
            if let Some(jump) = preceding_jump {
                return Ok(interpolate_after_jump(jump, segment, elapsed, duration));
            }

            let (end_fill, end_claim) = segments
                .get(i + 1)
                .map_or((0, 0), |next| (next.fill_increase(), next.claim_decrease()));

            return Ok(DecayAdjustment::new(
                locate_amount(segment.fill_increase(), end_fill, elapsed, duration, Rounding::Up),
                locate_amount(
                    segment.claim_decrease(),
                    end_claim,
                    elapsed,
                    duration,
                    Rounding::Down,
                ),
            ));
        }

        blocks_counted = segment_end;
    }

    Err(TribunalError::DecayBlocksExceeded {
        blocks_passed,
        covered: blocks_counted,
    })
}

/// Block-weighted linear interpolation between `start` (at `elapsed == 0`)
/// and `end` (at `elapsed == duration`).
fn locate_amount(start: u128, end: u128, elapsed: u64, duration: u64, rounding: Rounding) -> U256 {
    if start == end {
        return U256::from(end);
    }

    let remaining = duration - elapsed;
    // 120-bit values times 16-bit block counts: at most 137 bits.
    let total = U256::from(start) * U256::from(remaining) + U256::from(end) * U256::from(elapsed);
    if total.is_zero() {
        return U256::ZERO;
    }

    let duration = U256::from(duration);
    match rounding {
        Rounding::Up => (total - U256::from(1u8)) / duration + U256::from(1u8),
        Rounding::Down => total / duration,
    }
}

/// Percentage-progress interpolation from a preceding jump's values toward
/// the current segment's values.
fn interpolate_after_jump(
    jump: &DecaySegment,
    segment: &DecaySegment,
    elapsed: u64,
    duration: u64,
) -> DecayAdjustment {
    let progress = elapsed * PERCENT_SCALE / duration;
    DecayAdjustment::new(
        step_toward(jump.fill_increase(), segment.fill_increase(), progress),
        step_toward(jump.claim_decrease(), segment.claim_decrease(), progress),
    )
}

fn step_toward(from: u128, to: u128, progress: u64) -> U256 {
    let scale = U256::from(PERCENT_SCALE);
    let progress = U256::from(progress);
    let from_wide = U256::from(from);
    if to >= from {
        from_wide + U256::from(to - from) * progress / scale
    } else {
        from_wide - U256::from(from - to) * progress / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(d: u16, f: u128, c: u128) -> DecaySegment {
        DecaySegment::new(d, f, c).unwrap()
    }

    fn reference_curve() -> Vec<DecaySegment> {
        vec![seg(5, 10, 20), seg(5, 5, 10), seg(0, 0, 5), seg(5, 10, 10)]
    }

    fn at(curve: &[DecaySegment], blocks: u64) -> (u64, u64) {
        let adj = evaluate_segments(curve, blocks).unwrap();
        (adj.fill_increase.to::<u64>(), adj.claim_decrease.to::<u64>())
    }

    #[test]
    fn empty_curve_is_zero_for_any_block() {
        for blocks in [0, 1, 1_000, u64::MAX] {
            assert_eq!(
                evaluate_segments(&[], blocks).unwrap(),
                DecayAdjustment::default()
            );
        }
    }

    #[test]
    fn reference_curve_first_segment() {
        let curve = reference_curve();
        assert_eq!(at(&curve, 0), (10, 20));
        assert_eq!(at(&curve, 1), (9, 18));
        assert_eq!(at(&curve, 4), (6, 12));
    }

    #[test]
    fn reference_curve_interpolates_toward_jump_values() {
        let curve = reference_curve();
        assert_eq!(at(&curve, 5), (5, 10));
        assert_eq!(at(&curve, 9), (1, 6));
    }

    #[test]
    fn reference_curve_jump_applies_at_its_offset() {
        assert_eq!(at(&reference_curve(), 10), (0, 5));
    }

    #[test]
    fn reference_curve_after_jump_uses_percentage_progress() {
        let curve = reference_curve();
        assert_eq!(at(&curve, 11), (2, 6));
        assert_eq!(at(&curve, 14), (8, 9));
    }

    #[test]
    fn reference_curve_exhausted() {
        let curve = reference_curve();
        for blocks in [15, 16, 1_000] {
            let err = evaluate_segments(&curve, blocks).unwrap_err();
            assert!(
                matches!(err, TribunalError::DecayBlocksExceeded { covered: 15, .. }),
                "block {blocks}: {err:?}"
            );
        }
    }

    #[test]
    fn packed_words_evaluate_like_segments() {
        let curve = reference_curve();
        let words = tribunal_types::pack_curve(&curve);
        for blocks in 0..15 {
            assert_eq!(
                evaluate_curve(&words, blocks).unwrap(),
                evaluate_segments(&curve, blocks).unwrap()
            );
        }
    }

    #[test]
    fn last_segment_decays_to_zero() {
        let curve = vec![seg(4, 8, 8)];
        assert_eq!(at(&curve, 0), (8, 8));
        assert_eq!(at(&curve, 1), (6, 6));
        assert_eq!(at(&curve, 3), (2, 2));
    }

    #[test]
    fn rounding_favors_fill_up_and_claim_down() {
        // 3 -> 0 over 2 blocks: midpoint is 1.5
        let curve = vec![seg(2, 3, 3)];
        assert_eq!(at(&curve, 1), (2, 1));
    }

    #[test]
    fn constant_segment_returns_end_value() {
        let curve = vec![seg(3, 7, 7), seg(3, 7, 7)];
        assert_eq!(at(&curve, 1), (7, 7));
    }

    #[test]
    fn zero_start_and_end_yield_zero() {
        let curve = vec![seg(3, 0, 0), seg(1, 0, 0)];
        assert_eq!(at(&curve, 2), (0, 0));
    }

    #[test]
    fn leading_jump_applies_at_block_zero() {
        let curve = vec![seg(0, 4, 4), seg(10, 14, 24)];
        assert_eq!(at(&curve, 0), (4, 4));
        // 5 of 10 blocks: 50% of the way from (4, 4) to (14, 24)
        assert_eq!(at(&curve, 5), (9, 14));
    }

    #[test]
    fn descending_after_jump_uses_percentage_progress() {
        let curve = vec![seg(0, 20, 20), seg(10, 0, 0)];
        // 30% of the way from (20, 20) down to (0, 0)
        assert_eq!(at(&curve, 3), (14, 14));
    }

    #[test]
    fn after_jump_step_is_floored_toward_jump_values() {
        // progress = floor(1 * 100 / 3) = 33; step = floor(7 * 33 / 100) = 2
        let down = vec![seg(0, 7, 7), seg(3, 0, 0)];
        assert_eq!(at(&down, 1), (5, 5));
        let up = vec![seg(0, 0, 0), seg(3, 7, 7)];
        assert_eq!(at(&up, 1), (2, 2));
    }

    #[test]
    fn trailing_jump_applies_at_curve_end() {
        let curve = vec![seg(2, 2, 2), seg(0, 9, 9)];
        assert_eq!(at(&curve, 2), (9, 9));
        assert!(evaluate_segments(&curve, 3).is_err());
    }

    #[test]
    fn max_values_do_not_overflow() {
        let max = DecaySegment::MAX_VALUE;
        let curve = vec![seg(u16::MAX, max, max), seg(u16::MAX, 0, 0)];
        let adj = evaluate_segments(&curve, 1).unwrap();
        assert!(adj.fill_increase <= U256::from(max));
        assert!(adj.claim_decrease < U256::from(max));
    }
}
