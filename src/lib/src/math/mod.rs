//! Fixed-point integer math shared by the bonding curve and the swap helpers.
//!
//! Everything here works on unsigned integers only:
//! - `U256` / `U512` wide integers for intermediates that would overflow `u128`
//! - `integer_sqrt` (Newton iteration, floor semantics)
//! - `exp2_ratio` for `2^(num/den)` in `RAY` fixed point
//! - constant-product swap helpers (`amount_out`, `optimal_swap_amount`)

pub mod exp2;
pub mod sqrt;
pub mod swap;
pub mod wide;

pub use exp2::{exp2_ratio, LN_2_RAY, MAX_WHOLE_EXPONENT, RAY};
pub use sqrt::integer_sqrt;
pub use swap::{amount_out, optimal_swap_amount, SwapFee};
pub use wide::{mul_div, to_u128, U256, U512};

use thiserror::Error;

/// 18-decimal fixed-point scale used for prices and amounts.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Arithmetic failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("precision loss leads to underflow")]
    PrecisionUnderflow,

    #[error("insufficient input amount")]
    InsufficientInputAmount,

    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    #[error("invalid swap fee {numerator}/{denominator}")]
    InvalidFee { numerator: u64, denominator: u64 },
}
