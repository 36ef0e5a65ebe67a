//! Structured-data hashing for mandates and claims.
//!
//! Both hashes follow the EIP-712 `hashStruct` shape: the keccak256 of the
//! type hash followed by each field as a 32-byte ABI word, in type-string
//! order. Dynamic arrays (the decay curve) enter as the keccak256 of their
//! packed words, so the curve's contents, not its location, determine the
//! hash.
//!
//! The mandate hash is domain-bound: `chainId` and the settling instance's
//! address are its first two fields.

use std::sync::LazyLock;

use alloy_primitives::{Address, B256, U256, keccak256};
use alloy_sol_types::SolValue;
use tribunal_types::constants::{
    AMOUNT_ARGUMENT_INDEX, COMPACT_WITH_MANDATE_TYPESTRING, MANDATE_TYPESTRING,
    TOKEN_ARGUMENT_INDEX, WITNESS_TYPESTRING,
};
use tribunal_types::{Compact, Mandate};

static MANDATE_TYPEHASH: LazyLock<B256> = LazyLock::new(|| keccak256(MANDATE_TYPESTRING));

static COMPACT_TYPEHASH: LazyLock<B256> =
    LazyLock::new(|| keccak256(COMPACT_WITH_MANDATE_TYPESTRING));

/// keccak256 of the mandate type string.
#[must_use]
pub fn mandate_typehash() -> B256 {
    *MANDATE_TYPEHASH
}

/// keccak256 of the compact-with-mandate type string.
#[must_use]
pub fn compact_typehash() -> B256 {
    *COMPACT_TYPEHASH
}

/// Hash of the packed decay-curve words.
#[must_use]
pub fn decay_curve_hash(curve: &[U256]) -> B256 {
    let mut packed = Vec::with_capacity(curve.len() * 32);
    for word in curve {
        packed.extend_from_slice(&word.to_be_bytes::<32>());
    }
    keccak256(packed)
}

fn encode_mandate(mandate: &Mandate, chain_id: u64, tribunal: Address) -> Vec<u8> {
    (
        mandate_typehash(),
        U256::from(chain_id),
        tribunal,
        mandate.recipient,
        mandate.expires,
        mandate.token,
        mandate.minimum_amount,
        mandate.baseline_priority_fee,
        mandate.scaling_factor,
        decay_curve_hash(&mandate.decay_curve),
        mandate.salt,
    )
        .abi_encode()
}

/// Derive the mandate hash for a given settlement domain.
#[must_use]
pub fn derive_mandate_hash(mandate: &Mandate, chain_id: u64, tribunal: Address) -> B256 {
    keccak256(encode_mandate(mandate, chain_id, tribunal))
}

/// Derive the claim hash binding a compact to a mandate hash.
#[must_use]
pub fn derive_claim_hash(compact: &Compact, mandate_hash: B256) -> B256 {
    keccak256(
        (
            compact_typehash(),
            compact.arbiter,
            compact.sponsor,
            compact.nonce,
            compact.expires,
            compact.id,
            compact.amount,
            mandate_hash,
        )
            .abi_encode(),
    )
}

/// Layout of the mandate witness, for external signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessDetails {
    /// Witness fragment to append to the compact type string.
    pub type_string: &'static str,
    /// Index of the settlement token among the mandate arguments.
    pub token_argument_index: usize,
    /// Index of the settlement amount among the mandate arguments.
    pub amount_argument_index: usize,
}

#[must_use]
pub fn witness_details() -> WitnessDetails {
    WitnessDetails {
        type_string: WITNESS_TYPESTRING,
        token_argument_index: TOKEN_ARGUMENT_INDEX,
        amount_argument_index: AMOUNT_ARGUMENT_INDEX,
    }
}

#[cfg(test)]
mod tests {
    use tribunal_types::DecaySegment;

    use super::*;

    const CHAIN_ID: u64 = 10;

    fn tribunal() -> Address {
        Address::repeat_byte(0x7B)
    }

    fn mandate() -> Mandate {
        Mandate::dummy(Address::repeat_byte(0x0C), U256::from(1_000), 2_000)
    }

    #[test]
    fn typehashes_match_type_strings() {
        assert_eq!(mandate_typehash(), keccak256(MANDATE_TYPESTRING.as_bytes()));
        assert_eq!(
            compact_typehash(),
            keccak256(COMPACT_WITH_MANDATE_TYPESTRING.as_bytes())
        );
        assert_ne!(mandate_typehash(), compact_typehash());
    }

    #[test]
    fn empty_curve_hashes_empty_bytes() {
        assert_eq!(decay_curve_hash(&[]), keccak256(b""));
    }

    #[test]
    fn mandate_encoding_is_one_word_per_field() {
        let encoded = encode_mandate(&mandate(), CHAIN_ID, tribunal());
        assert_eq!(encoded.len(), 11 * 32);
        assert_eq!(&encoded[..32], mandate_typehash().as_slice());
        // chainId is right-aligned in the second word
        assert_eq!(encoded[63], 10);
        // addresses are left-padded to 32 bytes
        assert_eq!(&encoded[64..76], &[0u8; 12]);
        assert_eq!(&encoded[76..96], tribunal().as_slice());
    }

    #[test]
    fn mandate_hash_deterministic() {
        let m = mandate();
        assert_eq!(
            derive_mandate_hash(&m, CHAIN_ID, tribunal()),
            derive_mandate_hash(&m.clone(), CHAIN_ID, tribunal())
        );
    }

    #[test]
    fn salt_changes_mandate_hash() {
        let a = mandate();
        let mut b = a.clone();
        b.salt = B256::repeat_byte(0xFF);
        assert_ne!(
            derive_mandate_hash(&a, CHAIN_ID, tribunal()),
            derive_mandate_hash(&b, CHAIN_ID, tribunal())
        );
    }

    #[test]
    fn domain_changes_mandate_hash() {
        let m = mandate();
        let base = derive_mandate_hash(&m, CHAIN_ID, tribunal());
        assert_ne!(base, derive_mandate_hash(&m, CHAIN_ID + 1, tribunal()));
        assert_ne!(base, derive_mandate_hash(&m, CHAIN_ID, Address::repeat_byte(1)));
    }

    #[test]
    fn curve_contents_change_mandate_hash() {
        let a = mandate().with_decay_curve(&[DecaySegment::new(5, 1, 1).unwrap()]);
        let mut b = a.clone();
        b.decay_curve = tribunal_types::pack_curve(&[DecaySegment::new(5, 1, 2).unwrap()]);
        assert_ne!(
            derive_mandate_hash(&a, CHAIN_ID, tribunal()),
            derive_mandate_hash(&b, CHAIN_ID, tribunal())
        );
    }

    #[test]
    fn claim_hash_binds_compact_and_mandate() {
        let compact = Compact::dummy(Address::repeat_byte(0x5B), U256::from(1_000));
        let mh = derive_mandate_hash(&mandate(), CHAIN_ID, tribunal());
        let base = derive_claim_hash(&compact, mh);

        let mut other = compact.clone();
        other.amount = U256::from(999);
        assert_ne!(base, derive_claim_hash(&other, mh));
        assert_ne!(base, derive_claim_hash(&compact, B256::repeat_byte(1)));
        assert_eq!(base, derive_claim_hash(&compact, mh));
    }

    #[test]
    fn witness_details_layout() {
        let details = witness_details();
        assert!(details.type_string.starts_with("Mandate mandate)"));
        assert_eq!(details.token_argument_index, 4);
        assert_eq!(details.amount_argument_index, 5);
    }
}
