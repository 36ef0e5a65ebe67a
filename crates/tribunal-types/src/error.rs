//! Error types for the Tribunal settlement core.
//!
//! All errors use the `TB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Amount derivation errors
//! - 2xx: Decay curve errors
//! - 3xx: Fill condition errors
//! - 4xx: Disposition / authorization errors
//! - 5xx: Execution errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the whole operation: no disposition is recorded and no
//! caller value is kept.

use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

/// Central error enum for all Tribunal operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TribunalError {
    // =================================================================
    // Amount Derivation Errors (1xx)
    // =================================================================
    /// The effective gas price is below the block base fee.
    #[error("TB_ERR_100: Invalid gas price: {gas_price} below base fee {base_fee}")]
    InvalidGasPrice { gas_price: U256, base_fee: U256 },

    /// A fixed-point or scaling product does not fit in 256 bits.
    #[error("TB_ERR_101: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    // =================================================================
    // Decay Curve Errors (2xx)
    // =================================================================
    /// More blocks have elapsed than the decay curve covers.
    #[error("TB_ERR_200: Decay blocks exceeded: {blocks_passed} blocks passed, curve covers {covered}")]
    DecayBlocksExceeded { blocks_passed: u64, covered: u64 },

    /// A decay segment field does not fit its 120-bit slot.
    #[error("TB_ERR_201: Decay segment {field} out of range: {value}")]
    DecaySegmentOverflow { field: &'static str, value: u128 },

    // =================================================================
    // Fill Condition Errors (3xx)
    // =================================================================
    /// The mandate's deadline has passed.
    #[error("TB_ERR_300: Mandate expired at {expires}")]
    Expired { expires: U256 },

    /// The designated target block lies in the future.
    #[error("TB_ERR_301: Invalid target block {target_block}: current block is {current_block}")]
    InvalidTargetBlock { target_block: u64, current_block: u64 },

    /// Target block and decay curve are not paired, or too many blocks have
    /// passed since the target block.
    #[error("TB_ERR_302: Invalid target block designation: {reason}")]
    InvalidTargetBlockDesignation { reason: String },

    // =================================================================
    // Disposition / Authorization Errors (4xx)
    // =================================================================
    /// The claim hash has already been settled or cancelled.
    #[error("TB_ERR_400: Claim already disposed: {0}")]
    AlreadyClaimed(B256),

    /// Only the compact's sponsor may cancel.
    #[error("TB_ERR_401: Caller {caller} is not the sponsor {sponsor}")]
    NotSponsor { caller: Address, sponsor: Address },

    /// The sponsor signature failed verification.
    #[error("TB_ERR_402: Invalid sponsor signature for claim {0}")]
    InvalidSponsorSignature(B256),

    // =================================================================
    // Execution Errors (5xx)
    // =================================================================
    /// A fill or cancel was entered while another one was still running.
    #[error("TB_ERR_500: Reentrant call rejected")]
    ReentrancyGuard,

    /// The caller supplied less native value than the settlement requires.
    #[error("TB_ERR_501: Insufficient value: need {needed}, supplied {supplied}")]
    InsufficientValue { needed: U256, supplied: U256 },

    /// The ledger refused a transfer.
    #[error("TB_ERR_502: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// The directive processor refused to process or quote.
    #[error("TB_ERR_503: Directive failed: {reason}")]
    DirectiveFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("TB_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TribunalError>;

impl From<serde_json::Error> for TribunalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
