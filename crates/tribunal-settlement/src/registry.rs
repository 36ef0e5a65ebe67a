//! Write-once claim registry that prevents double disposition.
//!
//! Like a spent-output set: each claim hash can be settled or cancelled
//! exactly once. Every fill and cancel routes through
//! [`ClaimRegistry::set_if_unset`] (or its staged form), so of any set of
//! racing attempts on the same claim hash only one can win.
//!
//! Entries are never evicted: forgetting a disposition would let the claim
//! be filled again.

use std::collections::HashMap;

use alloy_primitives::B256;
use parking_lot::Mutex;
use tribunal_types::{Disposition, Result, TribunalError};

/// Mapping from claim hash to its terminal disposition.
///
/// Exposes only reads and atomic check-and-set; there is no public way to
/// overwrite or clear an entry.
#[derive(Default)]
pub struct ClaimRegistry {
    dispositions: Mutex<HashMap<B256, Disposition>>,
}

impl ClaimRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current disposition of a claim hash.
    pub fn get(&self, claim_hash: &B256) -> Disposition {
        self.dispositions
            .lock()
            .get(claim_hash)
            .copied()
            .unwrap_or_default()
    }

    /// Atomically record `disposition` if the claim hash is still unset.
    ///
    /// Returns `false` and leaves state unchanged if the hash was already
    /// disposed of, or if `disposition` is itself [`Disposition::Unset`].
    pub fn set_if_unset(&self, claim_hash: B256, disposition: Disposition) -> bool {
        let mut dispositions = self.dispositions.lock();
        let current = dispositions.get(&claim_hash).copied().unwrap_or_default();
        if !current.can_transition_to(disposition) {
            return false;
        }
        dispositions.insert(claim_hash, disposition);
        true
    }

    /// Record a disposition that reverts to unset unless committed.
    ///
    /// The entry is visible (and blocks competing attempts) from the moment
    /// this returns. Dropping the handle without calling
    /// [`StagedDisposition::commit`] removes it again.
    ///
    /// # Errors
    /// Returns [`TribunalError::AlreadyClaimed`] if the claim hash was
    /// already disposed of.
    pub(crate) fn stage(
        &self,
        claim_hash: B256,
        disposition: Disposition,
    ) -> Result<StagedDisposition<'_>> {
        if !self.set_if_unset(claim_hash, disposition) {
            return Err(TribunalError::AlreadyClaimed(claim_hash));
        }
        Ok(StagedDisposition {
            registry: self,
            claim_hash,
            committed: false,
        })
    }

    /// Number of disposed claim hashes.
    pub fn len(&self) -> usize {
        self.dispositions.lock().len()
    }

    /// Whether no claim hash has been disposed of yet.
    pub fn is_empty(&self) -> bool {
        self.dispositions.lock().is_empty()
    }
}

/// A disposition written to the registry but not yet final.
pub(crate) struct StagedDisposition<'a> {
    registry: &'a ClaimRegistry,
    claim_hash: B256,
    committed: bool,
}

impl StagedDisposition<'_> {
    /// Make the disposition permanent.
    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for StagedDisposition<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.registry.dispositions.lock().remove(&self.claim_hash);
            tracing::warn!(claim_hash = %self.claim_hash, "disposition rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;

    fn hash(n: u8) -> B256 {
        B256::repeat_byte(n)
    }

    #[test]
    fn first_set_ok() {
        let registry = ClaimRegistry::new();
        let claimant = Address::repeat_byte(1);
        assert!(registry.set_if_unset(hash(1), Disposition::Settled(claimant)));
        assert_eq!(registry.get(&hash(1)), Disposition::Settled(claimant));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn second_set_leaves_state_unchanged() {
        let registry = ClaimRegistry::new();
        let claimant = Address::repeat_byte(1);
        let sponsor = Address::repeat_byte(2);
        assert!(registry.set_if_unset(hash(1), Disposition::Settled(claimant)));
        assert!(!registry.set_if_unset(hash(1), Disposition::Cancelled(sponsor)));
        assert!(!registry.set_if_unset(hash(1), Disposition::Settled(sponsor)));
        assert_eq!(registry.get(&hash(1)), Disposition::Settled(claimant));
    }

    #[test]
    fn unset_value_is_not_recorded() {
        let registry = ClaimRegistry::new();
        assert!(!registry.set_if_unset(hash(1), Disposition::Unset));
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_hash_is_unset() {
        let registry = ClaimRegistry::new();
        assert_eq!(registry.get(&hash(9)), Disposition::Unset);
    }

    #[test]
    fn committed_stage_persists() {
        let registry = ClaimRegistry::new();
        let staged = registry
            .stage(hash(1), Disposition::Cancelled(Address::ZERO))
            .unwrap();
        staged.commit();
        assert!(registry.get(&hash(1)).is_set());
    }

    #[test]
    fn dropped_stage_rolls_back() {
        let registry = ClaimRegistry::new();
        {
            let _staged = registry
                .stage(hash(1), Disposition::Settled(Address::ZERO))
                .unwrap();
            assert!(registry.get(&hash(1)).is_set());
            let err = registry
                .stage(hash(1), Disposition::Settled(Address::ZERO))
                .err()
                .unwrap();
            assert!(matches!(err, TribunalError::AlreadyClaimed(h) if h == hash(1)));
        }
        assert_eq!(registry.get(&hash(1)), Disposition::Unset);
        assert!(registry.is_empty());
    }

    #[test]
    fn racing_threads_single_winner() {
        use std::sync::Arc;

        let registry = Arc::new(ClaimRegistry::new());
        let handles: Vec<_> = (0..16u8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.set_if_unset(hash(7), Disposition::Settled(Address::repeat_byte(i)))
                })
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(registry.len(), 1);
    }
}
