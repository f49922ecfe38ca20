/// Wide unsigned integers
///
/// `U256` carries prices and curve intermediates, `U512` only exists so that
/// `a * b / d` never overflows before the division.

use super::MathError;
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer, little-endian limbs.
    pub struct U256(4);
}

construct_uint! {
    /// 512-bit unsigned integer used for full-width products.
    pub struct U512(8);
}

impl From<U256> for U512 {
    fn from(value: U256) -> Self {
        let mut limbs = [0u64; 8];
        limbs[..4].copy_from_slice(&value.0);
        U512(limbs)
    }
}

impl TryFrom<U512> for U256 {
    type Error = MathError;

    fn try_from(value: U512) -> Result<Self, Self::Error> {
        if value.0[4..].iter().any(|&limb| limb != 0) {
            return Err(MathError::Overflow);
        }
        let mut limbs = [0u64; 4];
        limbs.copy_from_slice(&value.0[..4]);
        Ok(U256(limbs))
    }
}

/// `floor(a * b / denominator)` with a 512-bit intermediate product
#[inline]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = U512::from(a) * U512::from(b);
    U256::try_from(product / U512::from(denominator))
}

/// Checked narrowing to `u128`
#[inline]
pub fn to_u128(value: U256) -> Result<u128, MathError> {
    if value.bits() > 128 {
        return Err(MathError::Overflow);
    }
    Ok(value.low_u128())
}
