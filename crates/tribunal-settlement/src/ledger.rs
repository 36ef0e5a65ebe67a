//! In-memory reference ledger.
//!
//! Tracks per-(holder, token) balances, with the native asset under
//! [`NATIVE_TOKEN`]. All mutations are atomic: either the full transfer
//! succeeds or the balances are unchanged.
//!
//! Checkpoints are a stack of saved balance books. Reverting restores the
//! saved book; releasing drops it. Hosts can also take a whole
//! [`LedgerSnapshot`] of their own.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use parking_lot::Mutex;
use tribunal_types::constants::NATIVE_TOKEN;
use tribunal_types::{Result, TribunalError};

use crate::collaborators::{Checkpoint, Ledger};

/// Saved balances, restorable with [`InMemoryLedger::restore`].
#[derive(Debug, Clone)]
pub struct LedgerSnapshot(HashMap<(Address, Address), U256>);

/// Balance book keyed by `(holder, token)`.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<(Address, Address), U256>>,
    checkpoints: Mutex<Vec<LedgerSnapshot>>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` of `token` to `holder`.
    pub fn credit(&self, holder: Address, token: Address, amount: U256) {
        let mut balances = self.balances.lock();
        let entry = balances.entry((holder, token)).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Mint native value to `holder`.
    pub fn credit_native(&self, holder: Address, amount: U256) {
        self.credit(holder, NATIVE_TOKEN, amount);
    }

    #[must_use]
    pub fn balance(&self, holder: Address, token: Address) -> U256 {
        self.balances
            .lock()
            .get(&(holder, token))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn native_balance(&self, holder: Address) -> U256 {
        self.balance(holder, NATIVE_TOKEN)
    }

    /// Total supply of a token across all holders.
    #[must_use]
    pub fn total_supply(&self, token: Address) -> U256 {
        self.balances
            .lock()
            .iter()
            .filter(|((_, t), _)| *t == token)
            .fold(U256::ZERO, |acc, (_, amount)| acc.saturating_add(*amount))
    }

    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot(self.balances.lock().clone())
    }

    pub fn restore(&self, snapshot: LedgerSnapshot) {
        *self.balances.lock() = snapshot.0;
    }

    fn transfer(&self, token: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let mut balances = self.balances.lock();
        let available = balances.get(&(from, token)).copied().unwrap_or_default();
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| TribunalError::TransferFailed {
                reason: format!(
                    "{from} holds {available} of token {token}, needs {amount}"
                ),
            })?;
        balances.insert((from, token), remaining);
        let credited = balances.entry((to, token)).or_default();
        *credited = credited.saturating_add(amount);
        Ok(())
    }
}

impl Ledger for InMemoryLedger {
    fn transfer_native(&self, from: Address, to: Address, amount: U256) -> Result<()> {
        self.transfer(NATIVE_TOKEN, from, to, amount)
    }

    fn transfer_token(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.transfer(token, from, to, amount)
    }

    fn checkpoint(&self) -> Checkpoint {
        let mut checkpoints = self.checkpoints.lock();
        checkpoints.push(self.snapshot());
        Checkpoint(checkpoints.len() - 1)
    }

    fn revert_to(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut checkpoints = self.checkpoints.lock();
        if checkpoint.0 >= checkpoints.len() {
            return Err(TribunalError::Internal(format!(
                "unknown ledger checkpoint {}",
                checkpoint.0
            )));
        }
        let saved = checkpoints.swap_remove(checkpoint.0);
        checkpoints.truncate(checkpoint.0);
        self.restore(saved);
        Ok(())
    }

    fn release(&self, checkpoint: Checkpoint) {
        self.checkpoints.lock().truncate(checkpoint.0);
    }
}
