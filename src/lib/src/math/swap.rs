/// Constant-product swap helpers
///
/// Used when a commitment is split into a swap leg and a liquidity leg:
/// `optimal_swap_amount` picks the swap size so that the leftover input and
/// the swap output sit at the post-swap pool ratio.

use super::MathError;
use super::sqrt::integer_sqrt;
use super::wide::U256;
use serde::{Deserialize, Serialize};

/// Fraction of the input that survives the pool fee, `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapFee {
    pub numerator: u64,
    pub denominator: u64,
}

impl SwapFee {
    /// 0.3% fee, 997/1000
    pub const STANDARD: SwapFee = SwapFee {
        numerator: 997,
        denominator: 1000,
    };

    fn validate(&self) -> Result<(), MathError> {
        if self.numerator == 0 || self.denominator == 0 || self.numerator > self.denominator {
            return Err(MathError::InvalidFee {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }
}

impl Default for SwapFee {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Output of a constant-product swap after the fee.
pub fn amount_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: SwapFee,
) -> Result<U256, MathError> {
    fee.validate()?;
    if amount_in.is_zero() {
        return Err(MathError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(MathError::InsufficientLiquidity);
    }

    let with_fee = amount_in
        .checked_mul(U256::from(fee.numerator))
        .ok_or(MathError::Overflow)?;
    let numerator = with_fee.checked_mul(reserve_out).ok_or(MathError::Overflow)?;
    let denominator = reserve_in
        .checked_mul(U256::from(fee.denominator))
        .and_then(|v| v.checked_add(with_fee))
        .ok_or(MathError::Overflow)?;

    Ok(numerator / denominator)
}

/// Amount of `commit` to swap before adding the rest as liquidity.
///
/// With fee `g/d` and input reserve `R`:
///
/// ```text
/// s = (sqrt(R²·(d+g)² + 4·g·d·R·x) − R·(d+g)) / (2·g)
/// ```
///
/// For the standard fee this is `(sqrt(R²·3988009 + R·x·3988000) − R·1997) / 1994`.
pub fn optimal_swap_amount(
    commit: U256,
    reserve_in: U256,
    fee: SwapFee,
) -> Result<U256, MathError> {
    fee.validate()?;
    if commit.is_zero() {
        return Err(MathError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() {
        return Err(MathError::InsufficientLiquidity);
    }

    let g = U256::from(fee.numerator);
    let d = U256::from(fee.denominator);
    let g_plus_d = g + d;

    let reserve_term = reserve_in
        .checked_mul(reserve_in)
        .and_then(|v| v.checked_mul(g_plus_d * g_plus_d))
        .ok_or(MathError::Overflow)?;
    let commit_term = reserve_in
        .checked_mul(commit)
        .and_then(|v| v.checked_mul(U256::from(4u64) * g * d))
        .ok_or(MathError::Overflow)?;
    let discriminant = reserve_term
        .checked_add(commit_term)
        .ok_or(MathError::Overflow)?;

    let minuend = integer_sqrt(discriminant);
    let subtrahend = reserve_in.checked_mul(g_plus_d).ok_or(MathError::Overflow)?;
    let numerator = minuend
        .checked_sub(subtrahend)
        .ok_or(MathError::PrecisionUnderflow)?;

    Ok(numerator / (U256::from(2u64) * g))
}
