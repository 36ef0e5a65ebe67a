//! Priority-fee based amount scaling.
//!
//! Fillers compete on priority fee. Every wei of priority fee paid above the
//! mandate's baseline moves the amounts in the sponsor's favour by
//! `scaling_factor - 1e18`:
//!
//! | scaling factor | mode      | fixed amount | scaled amount              |
//! |----------------|-----------|--------------|----------------------------|
//! | `> 1e18`       | exact-in  | claim        | settlement, rounded up     |
//! | `< 1e18`       | exact-out | settlement   | claim, rounded down        |
//! | `== 1e18`      | none      | both         | n/a                        |

use alloy_primitives::U256;
use tribunal_types::{BlockContext, Result, TribunalError};

use crate::wad::Wad;

/// Amounts owed after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledAmounts {
    /// Paid by the filler to the mandate's recipient.
    pub settlement_amount: U256,
    /// Claimable by the filler from the sponsor's compact.
    pub claim_amount: U256,
}

/// Priority fee the executing transaction pays above the mandate's baseline,
/// floored at zero.
///
/// # Errors
/// Returns [`TribunalError::InvalidGasPrice`] if the effective gas price is
/// below the block base fee.
pub fn priority_fee_above_baseline(
    block: &BlockContext,
    baseline_priority_fee: U256,
) -> Result<U256> {
    let priority_fee =
        block
            .gas_price
            .checked_sub(block.base_fee)
            .ok_or(TribunalError::InvalidGasPrice {
                gas_price: block.gas_price,
                base_fee: block.base_fee,
            })?;
    Ok(priority_fee.saturating_sub(baseline_priority_fee))
}

/// Derive `(settlement_amount, claim_amount)` from the block's fees.
pub fn derive_amounts(
    block: &BlockContext,
    maximum_claim_amount: U256,
    minimum_settlement_amount: U256,
    baseline_priority_fee: U256,
    scaling_factor: U256,
) -> Result<ScaledAmounts> {
    let fee_above_baseline = priority_fee_above_baseline(block, baseline_priority_fee)?;
    scale_amounts(
        maximum_claim_amount,
        minimum_settlement_amount,
        scaling_factor,
        fee_above_baseline,
    )
}

/// Scale amounts for a known priority fee above baseline.
pub fn scale_amounts(
    maximum_claim_amount: U256,
    minimum_settlement_amount: U256,
    scaling_factor: U256,
    fee_above_baseline: U256,
) -> Result<ScaledAmounts> {
    let factor = Wad::from_raw(scaling_factor);

    if fee_above_baseline.is_zero() || factor.is_one() {
        return Ok(ScaledAmounts {
            settlement_amount: minimum_settlement_amount,
            claim_amount: maximum_claim_amount,
        });
    }

    let one = Wad::ONE.raw();

    if factor > Wad::ONE {
        let multiplier = (scaling_factor - one)
            .checked_mul(fee_above_baseline)
            .and_then(|boost| boost.checked_add(one))
            .ok_or(TribunalError::ArithmeticOverflow {
                context: "exact-in scaling multiplier",
            })?;
        let settlement_amount = Wad::from_raw(multiplier).mul_wad_up(minimum_settlement_amount)?;
        tracing::debug!(
            %fee_above_baseline,
            multiplier = %Wad::from_raw(multiplier),
            %settlement_amount,
            "exact-in scaling applied"
        );
        Ok(ScaledAmounts {
            settlement_amount,
            claim_amount: maximum_claim_amount,
        })
    } else {
        // A reduction too large for 256 bits certainly exceeds 1e18.
        let reduction = (one - scaling_factor)
            .checked_mul(fee_above_baseline)
            .unwrap_or(U256::MAX);
        let multiplier = one.saturating_sub(reduction);
        let claim_amount = Wad::from_raw(multiplier).mul_wad_down(maximum_claim_amount)?;
        tracing::debug!(
            %fee_above_baseline,
            multiplier = %Wad::from_raw(multiplier),
            %claim_amount,
            "exact-out scaling applied"
        );
        Ok(ScaledAmounts {
            settlement_amount: minimum_settlement_amount,
            claim_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tribunal_types::constants::WAD;

    use super::*;

    fn e18(mantissa: u64, decimals_below: u32) -> U256 {
        // mantissa * 10^(18 - decimals_below)
        U256::from(mantissa) * U256::from(10u64).pow(U256::from(18 - decimals_below))
    }

    fn gwei(x: u64) -> U256 {
        U256::from(x) * U256::from(1_000_000_000u64)
    }

    fn block_with_priority_fee(priority: U256) -> BlockContext {
        let base_fee = gwei(30);
        BlockContext::new(100, 1_000).with_fees(base_fee, base_fee + priority)
    }

    #[test]
    fn gas_price_below_base_fee_rejected() {
        let block = BlockContext::new(1, 1).with_fees(U256::from(10), U256::from(9));
        let err = priority_fee_above_baseline(&block, U256::ZERO).unwrap_err();
        assert!(matches!(err, TribunalError::InvalidGasPrice { .. }));
    }

    #[test]
    fn priority_fee_below_baseline_floors_at_zero() {
        let block = block_with_priority_fee(gwei(50));
        assert_eq!(
            priority_fee_above_baseline(&block, gwei(100)).unwrap(),
            U256::ZERO
        );
    }

    #[test]
    fn no_fee_above_baseline_is_noop() {
        let out = scale_amounts(U256::from(100), U256::from(90), e18(15, 1), U256::ZERO).unwrap();
        assert_eq!(out.settlement_amount, U256::from(90));
        assert_eq!(out.claim_amount, U256::from(100));
    }

    #[test]
    fn unit_scaling_factor_is_noop() {
        let out = scale_amounts(U256::from(100), U256::from(90), U256::from(WAD), U256::from(1_000))
            .unwrap();
        assert_eq!(out.settlement_amount, U256::from(90));
        assert_eq!(out.claim_amount, U256::from(100));
    }

    #[test]
    fn exact_in_scales_settlement_up() {
        let block = block_with_priority_fee(gwei(100) + U256::from(2));
        let out = derive_amounts(&block, e18(1, 0), e18(95, 2), gwei(100), e18(15, 1)).unwrap();
        assert_eq!(out.claim_amount, e18(1, 0));
        assert_eq!(out.settlement_amount, e18(19, 1));
    }

    #[test]
    fn exact_out_scales_claim_down_to_zero() {
        let block = block_with_priority_fee(gwei(100) + U256::from(2));
        let out = derive_amounts(&block, e18(1, 0), e18(95, 2), gwei(100), e18(5, 1)).unwrap();
        assert_eq!(out.settlement_amount, e18(95, 2));
        assert_eq!(out.claim_amount, U256::ZERO);
    }

    #[test]
    fn exact_out_partial_reduction() {
        // factor 0.9, fee 1 -> multiplier 0.9
        let out = scale_amounts(U256::from(1_000), U256::from(500), e18(9, 1), U256::from(1))
            .unwrap();
        assert_eq!(out.claim_amount, U256::from(900));
        assert_eq!(out.settlement_amount, U256::from(500));
    }

    #[test]
    fn exact_in_rounds_up() {
        // factor 1.5, fee 1 -> 3 * 1.5 = 4.5 -> 5
        let out = scale_amounts(U256::from(10), U256::from(3), e18(15, 1), U256::from(1)).unwrap();
        assert_eq!(out.settlement_amount, U256::from(5));
    }

    #[test]
    fn exact_out_multiplier_saturates_on_huge_fee() {
        let out = scale_amounts(U256::from(10), U256::from(3), e18(5, 1), U256::MAX).unwrap();
        assert_eq!(out.claim_amount, U256::ZERO);
    }

    #[test]
    fn exact_in_overflow_is_an_error() {
        let err = scale_amounts(U256::from(10), U256::from(3), e18(2, 0), U256::MAX).unwrap_err();
        assert!(matches!(err, TribunalError::ArithmeticOverflow { .. }));
    }

    proptest! {
        #[test]
        fn exact_out_claim_never_exceeds_maximum(
            maximum in any::<u128>(),
            factor in 0..WAD,
            fee in any::<u64>(),
        ) {
            let out = scale_amounts(
                U256::from(maximum),
                U256::from(1u8),
                U256::from(factor),
                U256::from(fee),
            ).unwrap();
            prop_assert!(out.claim_amount <= U256::from(maximum));
            prop_assert_eq!(out.settlement_amount, U256::from(1u8));
        }

        #[test]
        fn exact_in_settlement_never_below_minimum(
            minimum in any::<u64>(),
            boost in 1..WAD,
            fee in 0..1_000_000u64,
        ) {
            let out = scale_amounts(
                U256::from(7u8),
                U256::from(minimum),
                U256::from(WAD) + U256::from(boost),
                U256::from(fee),
            ).unwrap();
            prop_assert!(out.settlement_amount >= U256::from(minimum));
            prop_assert_eq!(out.claim_amount, U256::from(7u8));
        }
    }
}
