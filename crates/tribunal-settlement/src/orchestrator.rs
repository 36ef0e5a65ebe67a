//! Fill / cancel / quote orchestration.
//!
//! A fill runs, under the reentrancy lock:
//! 1. Check the mandate has not expired
//! 2. Validate the target block designation and count blocks passed
//! 3. Evaluate the decay curve at that offset
//! 4. Derive the mandate hash and claim hash
//! 5. Record `Settled(claimant)` in the registry (fails if already disposed)
//! 6. Scale the decayed amounts by the priority fee
//! 7. Transfer the settlement amount to the recipient
//! 8. Dispatch the directive carrying the claim amount
//! 9. Refund unconsumed caller value
//!
//! The registry entry is written before any collaborator runs, and every
//! ledger effect happens inside a ledger checkpoint. If any step fails the
//! checkpoint is reverted, the registry entry is rolled back and the caller's
//! escrowed value is returned, so a failed call leaves no partial transfer.
//!
//! Fill and cancel are serialised per instance by [`ReentrancyLock`]: a
//! nested call from a collaborator fails, a call from another thread waits.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use parking_lot::Mutex;
use tribunal_core::{
    DecayAdjustment, ScaledAmounts, WitnessDetails, derive_amounts, derive_claim_hash,
    derive_mandate_hash, evaluate_curve, witness_details,
};
use tribunal_types::{
    BlockContext, CallContext, Claim, Compact, Disposition, Mandate, Result, SettlementConfig,
    SettlementEvent, TribunalError,
};

use crate::collaborators::{
    Checkpoint, DirectiveContext, DirectiveProcessor, Ledger, SponsorAuthenticator,
};
use crate::reentrancy::ReentrancyLock;
use crate::registry::ClaimRegistry;

/// Designation of the block a fill's decay curve is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillTarget {
    pub target_block: u64,
    /// Fill is rejected once more blocks than this have passed.
    pub max_blocks_after_target: u64,
}

impl FillTarget {
    #[must_use]
    pub fn new(target_block: u64, max_blocks_after_target: u64) -> Self {
        Self {
            target_block,
            max_blocks_after_target,
        }
    }
}

/// Result of a successful fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOutcome {
    pub mandate_hash: B256,
    pub claim_hash: B256,
    pub settlement_amount: U256,
    pub claim_amount: U256,
    /// Native value consumed by directive dispatch.
    pub dispensation: U256,
    /// Native value returned to the caller.
    pub refund: U256,
}

/// Settlement engine for one deployment.
///
/// Owns the claim registry and the reentrancy lock; drives the injected
/// ledger and directive processor.
pub struct SettlementOrchestrator {
    config: SettlementConfig,
    registry: ClaimRegistry,
    lock: ReentrancyLock,
    ledger: Arc<dyn Ledger>,
    directives: Arc<dyn DirectiveProcessor>,
    authenticator: Option<Arc<dyn SponsorAuthenticator>>,
    events: Mutex<Vec<SettlementEvent>>,
}

impl SettlementOrchestrator {
    /// Create an orchestrator bound to `config`'s domain.
    ///
    /// # Errors
    /// Returns [`TribunalError::Configuration`] if the config is invalid.
    pub fn new(
        config: SettlementConfig,
        ledger: Arc<dyn Ledger>,
        directives: Arc<dyn DirectiveProcessor>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: ClaimRegistry::new(),
            lock: ReentrancyLock::new(),
            ledger,
            directives,
            authenticator: None,
            events: Mutex::new(Vec::new()),
        })
    }

    /// Require a valid sponsor signature on every fill.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<dyn SponsorAuthenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Fill
    // ---------------------------------------------------------------------

    /// Fill a claim on behalf of `claimant`, paying the recipient from the
    /// caller's funds.
    ///
    /// # Errors
    /// - `ReentrancyGuard` if entered from inside another fill or cancel
    /// - `Expired` if the mandate deadline has passed
    /// - `InvalidTargetBlock` / `InvalidTargetBlockDesignation` /
    ///   `DecayBlocksExceeded` for target-block and decay-curve violations
    /// - `InvalidSponsorSignature` if an authenticator rejects the claim
    /// - `AlreadyClaimed` if the claim hash was already disposed of
    /// - `InvalidGasPrice` / `ArithmeticOverflow` from amount derivation
    /// - `InsufficientValue` / `TransferFailed` / `DirectiveFailed` from the
    ///   settlement effects
    pub fn fill(
        &self,
        ctx: &CallContext,
        claim: &Claim,
        mandate: &Mandate,
        claimant: Address,
        target: Option<FillTarget>,
    ) -> Result<FillOutcome> {
        let result = self.lock.enter().and_then(|_guard| {
            self.fill_locked(ctx, claim, mandate, claimant, target)
                .inspect_err(|_| self.return_escrow(ctx))
        });
        if let Err(err) = &result {
            tracing::warn!(
                sponsor = %claim.sponsor(),
                %claimant,
                error = %err,
                "fill rejected"
            );
        }
        result
    }

    fn fill_locked(
        &self,
        ctx: &CallContext,
        claim: &Claim,
        mandate: &Mandate,
        claimant: Address,
        target: Option<FillTarget>,
    ) -> Result<FillOutcome> {
        let block = &ctx.block;
        ensure_not_expired(mandate, block)?;
        let blocks_passed = blocks_passed(block, mandate, target)?;
        let adjustment = evaluate_curve(&mandate.decay_curve, blocks_passed)?;

        let mandate_hash = self.derive_mandate_hash(mandate);
        let claim_hash = derive_claim_hash(&claim.compact, mandate_hash);

        if let Some(authenticator) = &self.authenticator {
            if !authenticator.verify(claim.sponsor(), claim_hash, &claim.sponsor_signature) {
                return Err(TribunalError::InvalidSponsorSignature(claim_hash));
            }
        }

        let ledger_scope = LedgerScope::open(self.ledger.as_ref());
        let staged = self
            .registry
            .stage(claim_hash, Disposition::Settled(claimant))?;

        let amounts = adjusted_amounts(block, &claim.compact, mandate, adjustment)?;

        let mut remaining = ctx.value;
        if mandate.is_native() {
            remaining = remaining.checked_sub(amounts.settlement_amount).ok_or(
                TribunalError::InsufficientValue {
                    needed: amounts.settlement_amount,
                    supplied: ctx.value,
                },
            )?;
            self.ledger.transfer_native(
                self.config.tribunal,
                mandate.recipient,
                amounts.settlement_amount,
            )?;
        } else {
            self.ledger.transfer_token(
                mandate.token,
                ctx.caller,
                mandate.recipient,
                amounts.settlement_amount,
            )?;
        }

        let target_block = target.map_or(0, |t| t.target_block);
        let directive = DirectiveContext {
            claim,
            mandate_hash,
            claim_hash,
            claimant,
            claim_amount: amounts.claim_amount,
            target_block,
            max_blocks_after_target: target.map_or(0, |t| t.max_blocks_after_target),
            available_value: remaining,
        };
        let dispensation = self.directives.process(&directive)?;
        remaining = consume_dispensation(remaining, dispensation)?;

        self.refund(ctx.caller, remaining)?;
        staged.commit();
        ledger_scope.commit();

        tracing::info!(
            %claim_hash,
            %claimant,
            settlement_amount = %amounts.settlement_amount,
            claim_amount = %amounts.claim_amount,
            blocks_passed,
            "claim filled"
        );
        self.emit(SettlementEvent::Fill {
            sponsor: claim.sponsor(),
            claimant,
            claim_hash,
            settlement_amount: amounts.settlement_amount,
            claim_amount: amounts.claim_amount,
            target_block,
        });

        Ok(FillOutcome {
            mandate_hash,
            claim_hash,
            settlement_amount: amounts.settlement_amount,
            claim_amount: amounts.claim_amount,
            dispensation,
            refund: remaining,
        })
    }

    // ---------------------------------------------------------------------
    // Cancel
    // ---------------------------------------------------------------------

    /// Cancel a claim and notify the arbiter chain with a zero-amount
    /// directive. Only the sponsor may cancel.
    ///
    /// # Errors
    /// `ReentrancyGuard`, `NotSponsor`, `Expired`, `AlreadyClaimed`, or a
    /// collaborator failure.
    pub fn cancel(&self, ctx: &CallContext, claim: &Claim, mandate: &Mandate) -> Result<B256> {
        let result = self.lock.enter().and_then(|_guard| {
            self.cancel_locked(ctx, &claim.compact, mandate, Some(claim))
                .inspect_err(|_| self.return_escrow(ctx))
        });
        log_cancel_rejection(&result, &claim.compact);
        result
    }

    /// Cancel a claim without dispatching a directive.
    pub fn cancel_chain_exclusive(
        &self,
        ctx: &CallContext,
        compact: &Compact,
        mandate: &Mandate,
    ) -> Result<B256> {
        let result = self.lock.enter().and_then(|_guard| {
            self.cancel_locked(ctx, compact, mandate, None)
                .inspect_err(|_| self.return_escrow(ctx))
        });
        log_cancel_rejection(&result, compact);
        result
    }

    fn cancel_locked(
        &self,
        ctx: &CallContext,
        compact: &Compact,
        mandate: &Mandate,
        notify: Option<&Claim>,
    ) -> Result<B256> {
        if ctx.caller != compact.sponsor {
            return Err(TribunalError::NotSponsor {
                caller: ctx.caller,
                sponsor: compact.sponsor,
            });
        }
        ensure_not_expired(mandate, &ctx.block)?;

        let mandate_hash = self.derive_mandate_hash(mandate);
        let claim_hash = derive_claim_hash(compact, mandate_hash);
        let ledger_scope = LedgerScope::open(self.ledger.as_ref());
        let staged = self
            .registry
            .stage(claim_hash, Disposition::Cancelled(compact.sponsor))?;

        let mut remaining = ctx.value;
        if let Some(claim) = notify {
            let directive = DirectiveContext {
                claim,
                mandate_hash,
                claim_hash,
                claimant: compact.sponsor,
                claim_amount: U256::ZERO,
                target_block: 0,
                max_blocks_after_target: 0,
                available_value: remaining,
            };
            let dispensation = self.directives.process(&directive)?;
            remaining = consume_dispensation(remaining, dispensation)?;
        }

        self.refund(ctx.caller, remaining)?;
        staged.commit();
        ledger_scope.commit();

        tracing::info!(
            %claim_hash,
            sponsor = %compact.sponsor,
            notified = notify.is_some(),
            "claim cancelled"
        );
        self.emit(SettlementEvent::cancel(compact.sponsor, claim_hash));
        Ok(claim_hash)
    }

    // ---------------------------------------------------------------------
    // Quote
    // ---------------------------------------------------------------------

    /// Suggested dispensation for filling a claim now. Read-only.
    ///
    /// Fails exactly as the corresponding fill would before any effect runs,
    /// including `AlreadyClaimed`, so fillers never receive a quote for a
    /// claim they cannot fill. Waits for a fill or cancel running on another
    /// thread, so it never sees a disposition that may still roll back.
    pub fn quote(
        &self,
        block: &BlockContext,
        claim: &Claim,
        mandate: &Mandate,
        claimant: Address,
        target: Option<FillTarget>,
    ) -> Result<U256> {
        let _observer = self.lock.observe();
        ensure_not_expired(mandate, block)?;
        let blocks_passed = blocks_passed(block, mandate, target)?;
        let adjustment = evaluate_curve(&mandate.decay_curve, blocks_passed)?;

        let mandate_hash = self.derive_mandate_hash(mandate);
        let claim_hash = derive_claim_hash(&claim.compact, mandate_hash);
        if self.registry.get(&claim_hash).is_set() {
            return Err(TribunalError::AlreadyClaimed(claim_hash));
        }

        let amounts = adjusted_amounts(block, &claim.compact, mandate, adjustment)?;
        let directive = DirectiveContext {
            claim,
            mandate_hash,
            claim_hash,
            claimant,
            claim_amount: amounts.claim_amount,
            target_block: target.map_or(0, |t| t.target_block),
            max_blocks_after_target: target.map_or(0, |t| t.max_blocks_after_target),
            available_value: U256::ZERO,
        };
        let dispensation = self.directives.quote(&directive)?;
        tracing::debug!(%claim_hash, %dispensation, "quoted");
        Ok(dispensation)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Disposition of a claim hash.
    pub fn disposition(&self, claim_hash: &B256) -> Disposition {
        self.registry.get(claim_hash)
    }

    /// Party recorded for a claim hash: the claimant of a fill, the sponsor
    /// of a cancel, or the zero address while unset.
    pub fn filled(&self, claim_hash: &B256) -> Address {
        self.registry.get(claim_hash).recorded_party()
    }

    /// Mandate hash within this instance's domain.
    #[must_use]
    pub fn derive_mandate_hash(&self, mandate: &Mandate) -> B256 {
        derive_mandate_hash(mandate, self.config.chain_id, self.config.tribunal)
    }

    #[must_use]
    pub fn derive_claim_hash(&self, compact: &Compact, mandate_hash: B256) -> B256 {
        derive_claim_hash(compact, mandate_hash)
    }

    /// `(settlement_amount, claim_amount)` under `block`'s fees.
    pub fn derive_amounts(
        &self,
        block: &BlockContext,
        maximum_claim_amount: U256,
        minimum_settlement_amount: U256,
        baseline_priority_fee: U256,
        scaling_factor: U256,
    ) -> Result<ScaledAmounts> {
        derive_amounts(
            block,
            maximum_claim_amount,
            minimum_settlement_amount,
            baseline_priority_fee,
            scaling_factor,
        )
    }

    #[must_use]
    pub fn witness_details(&self) -> WitnessDetails {
        witness_details()
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> Vec<SettlementEvent> {
        self.events.lock().clone()
    }

    /// Access the claim registry.
    #[must_use]
    pub fn registry(&self) -> &ClaimRegistry {
        &self.registry
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Give back the value a failed call escrowed. Runs after the call's
    /// ledger checkpoint was reverted.
    fn return_escrow(&self, ctx: &CallContext) {
        if let Err(err) = self.refund(ctx.caller, ctx.value) {
            tracing::error!(
                caller = %ctx.caller,
                value = %ctx.value,
                error = %err,
                "escrow not returned"
            );
        }
    }

    fn refund(&self, caller: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        self.ledger
            .transfer_native(self.config.tribunal, caller, amount)
    }

    fn emit(&self, event: SettlementEvent) {
        self.events.lock().push(event);
    }
}

/// Ledger checkpoint reverted on drop unless committed.
struct LedgerScope<'a> {
    ledger: &'a dyn Ledger,
    checkpoint: Checkpoint,
    committed: bool,
}

impl<'a> LedgerScope<'a> {
    fn open(ledger: &'a dyn Ledger) -> Self {
        Self {
            ledger,
            checkpoint: ledger.checkpoint(),
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
        self.ledger.release(self.checkpoint);
    }
}

impl Drop for LedgerScope<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match self.ledger.revert_to(self.checkpoint) {
            Ok(()) => tracing::debug!(checkpoint = self.checkpoint.0, "ledger reverted"),
            Err(err) => tracing::error!(error = %err, "ledger revert failed"),
        }
    }
}

fn ensure_not_expired(mandate: &Mandate, block: &BlockContext) -> Result<()> {
    if mandate.is_expired(block.timestamp) {
        return Err(TribunalError::Expired {
            expires: mandate.expires,
        });
    }
    Ok(())
}

/// Blocks passed since the designated target block. Target-block usage and
/// decay-curve usage must come together.
fn blocks_passed(
    block: &BlockContext,
    mandate: &Mandate,
    target: Option<FillTarget>,
) -> Result<u64> {
    let Some(target) = target else {
        if mandate.has_decay_curve() {
            return Err(TribunalError::InvalidTargetBlockDesignation {
                reason: "decay curve requires a target block".into(),
            });
        }
        return Ok(0);
    };

    if target.target_block > block.number {
        return Err(TribunalError::InvalidTargetBlock {
            target_block: target.target_block,
            current_block: block.number,
        });
    }
    let passed = block.number - target.target_block;
    if passed > target.max_blocks_after_target {
        return Err(TribunalError::InvalidTargetBlockDesignation {
            reason: format!(
                "{passed} blocks passed since target, at most {} allowed",
                target.max_blocks_after_target
            ),
        });
    }
    Ok(passed)
}

/// Apply decay adjustments, then priority-fee scaling.
fn adjusted_amounts(
    block: &BlockContext,
    compact: &Compact,
    mandate: &Mandate,
    adjustment: DecayAdjustment,
) -> Result<ScaledAmounts> {
    let maximum_claim_amount = compact
        .amount
        .checked_sub(adjustment.claim_decrease)
        .ok_or(TribunalError::ArithmeticOverflow {
            context: "claim decrease exceeds compact amount",
        })?;
    let minimum_settlement_amount = mandate
        .minimum_amount
        .checked_add(adjustment.fill_increase)
        .ok_or(TribunalError::ArithmeticOverflow {
            context: "fill increase on minimum amount",
        })?;
    derive_amounts(
        block,
        maximum_claim_amount,
        minimum_settlement_amount,
        mandate.baseline_priority_fee,
        mandate.scaling_factor,
    )
}

fn consume_dispensation(available: U256, dispensation: U256) -> Result<U256> {
    available
        .checked_sub(dispensation)
        .ok_or_else(|| TribunalError::DirectiveFailed {
            reason: format!("dispensation {dispensation} exceeds available value {available}"),
        })
}

fn log_cancel_rejection(result: &Result<B256>, compact: &Compact) {
    if let Err(err) = result {
        tracing::warn!(sponsor = %compact.sponsor, error = %err, "cancel rejected");
    }
}
