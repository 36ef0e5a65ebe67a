//! Compacts and claims: the sponsor's source-of-funds authorization.
//!
//! A [`Compact`] is issued and signed outside this core; only its field
//! values matter here, because they feed the claim hash.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Sponsor's claim authorization over locked funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compact {
    /// Party that adjudicates the claim on the source chain.
    pub arbiter: Address,
    /// Owner of the locked funds; the only party allowed to cancel.
    pub sponsor: Address,
    pub nonce: U256,
    pub expires: U256,
    /// Resource lock identifier.
    pub id: U256,
    /// Maximum amount claimable from the lock.
    pub amount: U256,
}

/// A compact together with its origin chain and signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// Chain on which the compact was issued.
    pub chain_id: u64,
    pub compact: Compact,
    pub sponsor_signature: Bytes,
    pub allocator_signature: Bytes,
}

impl Claim {
    #[must_use]
    pub fn sponsor(&self) -> Address {
        self.compact.sponsor
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Compact {
    pub fn dummy(sponsor: Address, amount: U256) -> Self {
        Self {
            arbiter: Address::repeat_byte(0xA1),
            sponsor,
            nonce: U256::from(1),
            expires: U256::from(u64::MAX),
            id: U256::from(0x1D),
            amount,
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Claim {
    pub fn dummy(sponsor: Address, amount: U256) -> Self {
        Self {
            chain_id: 1,
            compact: Compact::dummy(sponsor, amount),
            sponsor_signature: Bytes::from_static(&[0x51; 65]),
            allocator_signature: Bytes::new(),
        }
    }
}
