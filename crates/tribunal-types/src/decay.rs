//! # DecaySegment: one piece of a decay curve
//!
//! A decay curve is an ordered list of segments. Each segment says how much
//! the fill amount has increased and the claim amount has decreased at its
//! start, and how many blocks it lasts.
//!
//! ## Packed layout
//!
//! ```text
//!  255        240 239                  120 119                    0
//! ┌────────────┬───────────────────────┬───────────────────────┐
//! │  duration  │     fill increase     │    claim decrease     │
//! │  (16 bit)  │       (120 bit)       │       (120 bit)       │
//! └────────────┴───────────────────────┴───────────────────────┘
//! ```
//!
//! Mandates carry the packed words; the packed form is what gets hashed.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::constants::{SEGMENT_DURATION_SHIFT, SEGMENT_FILL_SHIFT, SEGMENT_VALUE_BITS};
use crate::{Result, TribunalError};

/// Unpacked view of a single decay segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecaySegment {
    block_duration: u16,
    fill_increase: u128,
    claim_decrease: u128,
}

impl DecaySegment {
    /// Largest value a 120-bit field can hold.
    pub const MAX_VALUE: u128 = (1u128 << SEGMENT_VALUE_BITS) - 1;

    /// Build a segment, rejecting values that do not fit in 120 bits.
    pub fn new(block_duration: u16, fill_increase: u128, claim_decrease: u128) -> Result<Self> {
        if fill_increase > Self::MAX_VALUE {
            return Err(TribunalError::DecaySegmentOverflow {
                field: "fill_increase",
                value: fill_increase,
            });
        }
        if claim_decrease > Self::MAX_VALUE {
            return Err(TribunalError::DecaySegmentOverflow {
                field: "claim_decrease",
                value: claim_decrease,
            });
        }
        Ok(Self {
            block_duration,
            fill_increase,
            claim_decrease,
        })
    }

    /// Number of blocks this segment lasts. Zero marks an instantaneous jump.
    #[must_use]
    pub fn block_duration(&self) -> u16 {
        self.block_duration
    }

    #[must_use]
    pub fn fill_increase(&self) -> u128 {
        self.fill_increase
    }

    #[must_use]
    pub fn claim_decrease(&self) -> u128 {
        self.claim_decrease
    }

    /// Whether this segment is an instantaneous jump.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.block_duration == 0
    }

    /// Pack into a single 256-bit word.
    #[must_use]
    pub fn pack(&self) -> U256 {
        (U256::from(self.block_duration) << SEGMENT_DURATION_SHIFT)
            | (U256::from(self.fill_increase) << SEGMENT_FILL_SHIFT)
            | U256::from(self.claim_decrease)
    }

    /// Unpack a 256-bit word. Every word decodes to a valid segment.
    #[must_use]
    pub fn unpack(word: U256) -> Self {
        let mask = value_mask();
        Self {
            block_duration: (word >> SEGMENT_DURATION_SHIFT).to::<u16>(),
            fill_increase: ((word >> SEGMENT_FILL_SHIFT) & mask).to::<u128>(),
            claim_decrease: (word & mask).to::<u128>(),
        }
    }
}

fn value_mask() -> U256 {
    (U256::from(1u8) << SEGMENT_VALUE_BITS) - U256::from(1u8)
}

/// Pack a curve for inclusion in a mandate.
#[must_use]
pub fn pack_curve(segments: &[DecaySegment]) -> Vec<U256> {
    segments.iter().map(DecaySegment::pack).collect()
}

/// Unpack a mandate's curve words.
#[must_use]
pub fn unpack_curve(words: &[U256]) -> Vec<DecaySegment> {
    words.iter().copied().map(DecaySegment::unpack).collect()
}

/// Total number of blocks a curve covers (zero-duration segments add nothing).
#[must_use]
pub fn curve_duration(segments: &[DecaySegment]) -> u64 {
    segments.iter().map(|s| u64::from(s.block_duration)).sum()
}
