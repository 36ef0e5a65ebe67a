//! Interfaces to the external collaborators the orchestrator drives.
//!
//! The settlement core decides *what* moves; these traits decide *how*:
//!
//! - [`Ledger`]: moves native value or fungible tokens
//! - [`DirectiveProcessor`]: relays the outcome to the arbiter chain
//! - [`SponsorAuthenticator`]: checks sponsor signatures when required
//!
//! Every fill and cancel runs inside a ledger [`Checkpoint`]. When the
//! operation fails the orchestrator reverts the ledger to it, so no transfer
//! made by a failed call survives. A directive processor that returns an
//! error must leave no effect behind.

use alloy_primitives::{Address, B256, Bytes, U256};
use tribunal_types::{Claim, Result};

/// A point in a [`Ledger`]'s history that can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checkpoint(pub usize);

/// Moves balances between holders.
pub trait Ledger: Send + Sync {
    /// Move `amount` of the native asset.
    fn transfer_native(&self, from: Address, to: Address, amount: U256) -> Result<()>;

    /// Move `amount` of `token`.
    fn transfer_token(&self, token: Address, from: Address, to: Address, amount: U256)
    -> Result<()>;

    /// Mark the current balances. Checkpoints nest.
    fn checkpoint(&self) -> Checkpoint;

    /// Undo every transfer since `checkpoint`, discarding it and any
    /// checkpoint taken after it.
    fn revert_to(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Keep every transfer since `checkpoint`, discarding it and any
    /// checkpoint taken after it.
    fn release(&self, checkpoint: Checkpoint);
}

/// Everything a directive processor learns about a disposition.
#[derive(Debug, Clone)]
pub struct DirectiveContext<'a> {
    pub claim: &'a Claim,
    pub mandate_hash: B256,
    pub claim_hash: B256,
    /// Claimant for a fill, sponsor for a cancel.
    pub claimant: Address,
    /// Zero for a cancel.
    pub claim_amount: U256,
    /// Zero when no target block was designated.
    pub target_block: u64,
    pub max_blocks_after_target: u64,
    /// Native value still available to pay for dispatch.
    pub available_value: U256,
}

/// Dispatches the cross-chain directive that lets the claimant (or the
/// sponsor, on cancel) act on the source chain.
pub trait DirectiveProcessor: Send + Sync {
    /// Dispatch the directive. Returns the native value consumed, which must
    /// not exceed `ctx.available_value`.
    fn process(&self, ctx: &DirectiveContext<'_>) -> Result<U256>;

    /// Estimate the native value [`DirectiveProcessor::process`] would
    /// consume. Must not have side effects.
    fn quote(&self, ctx: &DirectiveContext<'_>) -> Result<U256>;
}

/// Directive processor for integrations that relay outcomes out of band.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDirectiveProcessor;

impl DirectiveProcessor for NoopDirectiveProcessor {
    fn process(&self, _ctx: &DirectiveContext<'_>) -> Result<U256> {
        Ok(U256::ZERO)
    }

    fn quote(&self, _ctx: &DirectiveContext<'_>) -> Result<U256> {
        Ok(U256::ZERO)
    }
}

/// Verifies that a sponsor authorized a claim hash.
pub trait SponsorAuthenticator: Send + Sync {
    fn verify(&self, sponsor: Address, claim_hash: B256, signature: &Bytes) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_processor_consumes_nothing() {
        let claim = Claim::dummy(Address::repeat_byte(1), U256::from(10));
        let ctx = DirectiveContext {
            claim: &claim,
            mandate_hash: B256::ZERO,
            claim_hash: B256::ZERO,
            claimant: Address::repeat_byte(2),
            claim_amount: U256::from(10),
            target_block: 0,
            max_blocks_after_target: 0,
            available_value: U256::from(5),
        };
        assert_eq!(NoopDirectiveProcessor.process(&ctx).unwrap(), U256::ZERO);
        assert_eq!(NoopDirectiveProcessor.quote(&ctx).unwrap(), U256::ZERO);
    }
}
