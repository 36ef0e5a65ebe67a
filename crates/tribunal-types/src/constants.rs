//! System-wide constants for the Tribunal settlement core.

use alloy_primitives::Address;

/// Fixed-point unity: `1e18` represents 1.0.
pub const WAD: u64 = 1_000_000_000_000_000_000;

/// EIP-712 style type string for a mandate. The field order here is the
/// field order of the hash encoding.
pub const MANDATE_TYPESTRING: &str = "Mandate(uint256 chainId,address tribunal,address recipient,uint256 expires,address token,uint256 minimumAmount,uint256 baselinePriorityFee,uint256 scalingFactor,uint256[] decayCurve,bytes32 salt)";

/// Type string for a compact that carries a mandate as its witness.
/// Referenced struct types are appended after the primary type.
pub const COMPACT_WITH_MANDATE_TYPESTRING: &str = "Compact(address arbiter,address sponsor,uint256 nonce,uint256 expires,uint256 id,uint256 amount,Mandate mandate)Mandate(uint256 chainId,address tribunal,address recipient,uint256 expires,address token,uint256 minimumAmount,uint256 baselinePriorityFee,uint256 scalingFactor,uint256[] decayCurve,bytes32 salt)";

/// Witness fragment handed to external signers: the tail of the compact
/// type string starting at the witness argument.
pub const WITNESS_TYPESTRING: &str = "Mandate mandate)Mandate(uint256 chainId,address tribunal,address recipient,uint256 expires,address token,uint256 minimumAmount,uint256 baselinePriorityFee,uint256 scalingFactor,uint256[] decayCurve,bytes32 salt)";

/// Zero-based index of `token` among the mandate's type-string arguments.
pub const TOKEN_ARGUMENT_INDEX: usize = 4;

/// Zero-based index of `minimumAmount` among the mandate's type-string arguments.
pub const AMOUNT_ARGUMENT_INDEX: usize = 5;

/// Bit offset of the block duration inside a packed decay segment.
pub const SEGMENT_DURATION_SHIFT: usize = 240;

/// Bit offset of the fill increase inside a packed decay segment.
pub const SEGMENT_FILL_SHIFT: usize = 120;

/// Width of the fill-increase and claim-decrease fields.
pub const SEGMENT_VALUE_BITS: usize = 120;

/// Interpolation scale used after an instantaneous (zero-duration) jump.
pub const PERCENT_SCALE: u64 = 100;

/// Token address denoting the chain's native asset.
pub const NATIVE_TOKEN: Address = Address::ZERO;

/// Prefix shared by every error code.
pub const ERROR_PREFIX: &str = "TB_ERR_";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Tribunal";
