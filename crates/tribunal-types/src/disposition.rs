//! # Disposition: the terminal state of a claim hash
//!
//! ## State Machine
//!
//! ```text
//!   ┌───────┐   fill    ┌─────────────────────┐
//!   │ UNSET ├──────────▶│ SETTLED (claimant)  │
//!   └───┬───┘           └─────────────────────┘
//!       │ cancel
//!       ▼
//!   ┌─────────────────────┐
//!   │ CANCELLED (sponsor) │
//!   └─────────────────────┘
//! ```
//!
//! Transitions are **write-once**: once a claim hash leaves `Unset` it never
//! changes again.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Disposition of a single claim hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Disposition {
    /// Neither filled nor cancelled.
    #[default]
    Unset,
    /// Filled; the claimant is entitled to the claim amount.
    Settled(Address),
    /// Cancelled by the sponsor.
    Cancelled(Address),
}

impl Disposition {
    /// Whether the claim hash has been disposed of.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// The recorded party: claimant for a fill, sponsor for a cancel, the
    /// zero address otherwise.
    #[must_use]
    pub fn recorded_party(&self) -> Address {
        match self {
            Self::Unset => Address::ZERO,
            Self::Settled(party) | Self::Cancelled(party) => *party,
        }
    }

    /// Can this disposition transition to the given target?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Unset, Self::Settled(_) | Self::Cancelled(_))
        )
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, "UNSET"),
            Self::Settled(claimant) => write!(f, "SETTLED({claimant})"),
            Self::Cancelled(sponsor) => write!(f, "CANCELLED({sponsor})"),
        }
    }
}
