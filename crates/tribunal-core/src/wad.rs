//! 18-decimal fixed-point arithmetic ("WAD").
//!
//! `1e18` represents 1.0. Multiplication never relies on implicit
//! truncation: callers pick [`Wad::mul_wad_down`] or [`Wad::mul_wad_up`], and an
//! intermediate product that does not fit in 256 bits is an error rather
//! than a wrap.

use std::fmt;

use alloy_primitives::U256;
use tribunal_types::constants::WAD;
use tribunal_types::{Result, TribunalError};

/// A fixed-point multiplier with 18 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wad(U256);

impl Wad {
    /// 1.0
    pub const ONE: Self = Self(U256::from_limbs([WAD, 0, 0, 0]));

    /// 0.0
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a raw 18-decimal value.
    #[must_use]
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> U256 {
        self.0
    }

    #[must_use]
    pub fn is_one(self) -> bool {
        self == Self::ONE
    }

    /// `amount * self / 1e18`, rounded toward zero.
    pub fn mul_wad_down(self, amount: U256) -> Result<U256> {
        let product = checked_product(amount, self.0)?;
        Ok(product / Self::ONE.0)
    }

    /// `amount * self / 1e18`, rounded away from zero.
    pub fn mul_wad_up(self, amount: U256) -> Result<U256> {
        let product = checked_product(amount, self.0)?;
        if product.is_zero() {
            return Ok(U256::ZERO);
        }
        Ok((product - U256::from(1u8)) / Self::ONE.0 + U256::from(1u8))
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::ONE.0;
        let frac = self.0 % Self::ONE.0;
        write!(f, "{whole}.{:0>18}", frac.to_string())
    }
}

fn checked_product(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or(TribunalError::ArithmeticOverflow {
        context: "wad multiplication",
    })
}
