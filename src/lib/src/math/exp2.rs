/// Fixed-point powers of two
///
/// `2^(num/den)` scaled by `RAY`. The whole part of the exponent is a shift,
/// the fractional part `f` goes through the Taylor series of `e^(f·ln 2)`.

use super::MathError;
use super::wide::{mul_div, U256};

/// 27-decimal fixed-point scale for curve intermediates.
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;

/// ln(2) · 10^27, truncated.
pub const LN_2_RAY: u128 = 693_147_180_559_945_309_417_232_121;

/// Largest whole part of an exponent; RAY · 2^128 still fits in 2^256.
pub const MAX_WHOLE_EXPONENT: u128 = 128;

/// Returns `2^(num / den)` scaled by `RAY`, rounded down.
pub fn exp2_ratio(num: u128, den: u128) -> Result<U256, MathError> {
    if den == 0 {
        return Err(MathError::DivisionByZero);
    }
    let whole = num / den;
    if whole > MAX_WHOLE_EXPONENT {
        return Err(MathError::Overflow);
    }
    let rem = num % den;

    let ray = U256::from(RAY);
    // x = (rem / den) · ln 2, in [0, ln 2)
    let x = mul_div(U256::from(rem), U256::from(LN_2_RAY), U256::from(den))?;

    let mut term = ray;
    let mut sum = ray;
    let mut k = 1u64;
    while !term.is_zero() {
        term = mul_div(term, x, ray * U256::from(k))?;
        sum += term;
        k += 1;
    }

    Ok(sum << whole as usize)
}
