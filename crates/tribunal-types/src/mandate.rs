//! The mandate: sponsor-authored settlement terms.
//!
//! A mandate is created off-system and signed as the witness of a compact.
//! The settlement core only ever reads it.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::constants::NATIVE_TOKEN;
use crate::decay::{DecaySegment, unpack_curve};

/// Fill conditions for a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mandate {
    /// Who receives the settlement amount.
    pub recipient: Address,
    /// Unix timestamp after which the mandate can no longer be filled.
    pub expires: U256,
    /// Settlement token; the zero address denotes the native asset.
    pub token: Address,
    /// Smallest settlement amount the sponsor accepts.
    pub minimum_amount: U256,
    /// Priority fee (wei) below which no scaling is applied.
    pub baseline_priority_fee: U256,
    /// WAD multiplier applied per wei of priority fee above the baseline.
    pub scaling_factor: U256,
    /// Packed decay segments, ordered by time.
    pub decay_curve: Vec<U256>,
    /// Replay-protection salt.
    pub salt: B256,
}

impl Mandate {
    /// A mandate expires once the current time reaches `expires`.
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires <= U256::from(now)
    }

    /// Whether settlement is paid in the chain's native asset.
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.token == NATIVE_TOKEN
    }

    /// Unpacked view of the decay curve.
    #[must_use]
    pub fn decay_segments(&self) -> Vec<DecaySegment> {
        unpack_curve(&self.decay_curve)
    }

    #[must_use]
    pub fn has_decay_curve(&self) -> bool {
        !self.decay_curve.is_empty()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Mandate {
    /// Native-asset mandate with no scaling, no decay, and a random salt.
    pub fn dummy(recipient: Address, minimum_amount: U256, expires: u64) -> Self {
        use rand::RngCore;

        let mut salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut salt);
        Self {
            recipient,
            expires: U256::from(expires),
            token: NATIVE_TOKEN,
            minimum_amount,
            baseline_priority_fee: U256::ZERO,
            scaling_factor: U256::from(crate::constants::WAD),
            decay_curve: Vec::new(),
            salt: B256::from(salt),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: Address) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn with_decay_curve(mut self, segments: &[DecaySegment]) -> Self {
        self.decay_curve = crate::decay::pack_curve(segments);
        self
    }

    #[must_use]
    pub fn with_scaling(mut self, baseline_priority_fee: U256, scaling_factor: U256) -> Self {
        self.baseline_priority_fee = baseline_priority_fee;
        self.scaling_factor = scaling_factor;
        self
    }
}
