//! Execution context supplied by the host for each operation.
//!
//! The core never reads a clock or a chain directly; the host passes in the
//! block it executes against and the caller that invoked it.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// The block an operation executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Current block number.
    pub number: u64,
    /// Current block timestamp (unix seconds).
    pub timestamp: u64,
    /// Block base fee per gas.
    pub base_fee: U256,
    /// Effective gas price paid by the executing transaction.
    pub gas_price: U256,
}

impl BlockContext {
    #[must_use]
    pub fn new(number: u64, timestamp: u64) -> Self {
        Self {
            number,
            timestamp,
            base_fee: U256::ZERO,
            gas_price: U256::ZERO,
        }
    }

    #[must_use]
    pub fn with_fees(mut self, base_fee: U256, gas_price: U256) -> Self {
        self.base_fee = base_fee;
        self.gas_price = gas_price;
        self
    }
}

/// Who called, with how much native value, in which block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Address,
    /// Native value escrowed with the call; whatever is not consumed is
    /// returned to `caller`.
    pub value: U256,
    pub block: BlockContext,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address, block: BlockContext) -> Self {
        Self {
            caller,
            value: U256::ZERO,
            block,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}
