//! # tribunal-core
//!
//! **Pure deterministic settlement math for Tribunal.**
//!
//! Everything here is a pure function of its inputs:
//!
//! - **WAD fixed point**: 18-decimal multiplication with explicit rounding
//! - **Decay curves**: elapsed blocks → (fill increase, claim decrease)
//! - **Amount scaling**: priority fee above baseline → scaled amounts
//! - **Hashing**: mandate hash and claim hash over fixed type strings
//!
//! No state, no I/O: same input → same output on every host.

pub mod decay;
pub mod hashing;
pub mod scaling;
pub mod wad;

pub use decay::{DecayAdjustment, evaluate_curve, evaluate_segments};
pub use hashing::{
    WitnessDetails, compact_typehash, decay_curve_hash, derive_claim_hash, derive_mandate_hash,
    mandate_typehash, witness_details,
};
pub use scaling::{ScaledAmounts, derive_amounts, priority_fee_above_baseline, scale_amounts};
pub use wad::Wad;
