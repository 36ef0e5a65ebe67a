//! Events emitted when a claim hash is disposed of.
//!
//! Events form an append-only log consumed by indexers and the arbiter
//! relay; one event per successful fill or cancel. Both kinds carry the same
//! fields. A cancel records the sponsor as claimant, zero amounts and a zero
//! target block.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Outcome of a successful fill or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementEvent {
    /// The claim was filled.
    Fill {
        sponsor: Address,
        claimant: Address,
        claim_hash: B256,
        settlement_amount: U256,
        claim_amount: U256,
        /// Zero when the fill did not designate a target block.
        target_block: u64,
    },
    /// The sponsor cancelled the claim.
    Cancel {
        sponsor: Address,
        /// Always the sponsor.
        claimant: Address,
        claim_hash: B256,
        /// Always zero.
        settlement_amount: U256,
        /// Always zero.
        claim_amount: U256,
        /// Always zero.
        target_block: u64,
    },
}

impl SettlementEvent {
    /// Cancellation event for `claim_hash`.
    #[must_use]
    pub fn cancel(sponsor: Address, claim_hash: B256) -> Self {
        Self::Cancel {
            sponsor,
            claimant: sponsor,
            claim_hash,
            settlement_amount: U256::ZERO,
            claim_amount: U256::ZERO,
            target_block: 0,
        }
    }

    #[must_use]
    pub fn claim_hash(&self) -> B256 {
        match self {
            Self::Fill { claim_hash, .. } | Self::Cancel { claim_hash, .. } => *claim_hash,
        }
    }

    #[must_use]
    pub fn sponsor(&self) -> Address {
        match self {
            Self::Fill { sponsor, .. } | Self::Cancel { sponsor, .. } => *sponsor,
        }
    }

    /// Claimant of a fill, or the sponsor for a cancel.
    #[must_use]
    pub fn claimant(&self) -> Address {
        match self {
            Self::Fill { claimant, .. } | Self::Cancel { claimant, .. } => *claimant,
        }
    }
}

impl std::fmt::Display for SettlementEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fill { .. } => write!(f, "FILL"),
            Self::Cancel { .. } => write!(f, "CANCEL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_display() {
        let cancel = SettlementEvent::cancel(Address::ZERO, B256::ZERO);
        assert_eq!(format!("{cancel}"), "CANCEL");
    }

    #[test]
    fn cancel_shares_fill_shape() {
        let sponsor = Address::repeat_byte(5);
        let cancel = SettlementEvent::cancel(sponsor, B256::repeat_byte(9));
        assert_eq!(cancel.claimant(), sponsor);
        assert_eq!(cancel.sponsor(), sponsor);

        let json = serde_json::to_value(&cancel).unwrap();
        assert_eq!(json["type"], "CANCEL");
        for field in [
            "sponsor",
            "claimant",
            "claim_hash",
            "settlement_amount",
            "claim_amount",
            "target_block",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["target_block"], 0);
    }

    #[test]
    fn event_serde_roundtrip() {
        let fill = SettlementEvent::Fill {
            sponsor: Address::repeat_byte(1),
            claimant: Address::repeat_byte(2),
            claim_hash: B256::repeat_byte(3),
            settlement_amount: U256::from(10),
            claim_amount: U256::from(20),
            target_block: 7,
        };
        let json = serde_json::to_string(&fill).unwrap();
        assert!(json.contains("\"type\":\"FILL\""));
        let back: SettlementEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(fill, back);
        assert_eq!(back.claim_hash(), B256::repeat_byte(3));
        assert_eq!(back.sponsor(), Address::repeat_byte(1));
    }
}
