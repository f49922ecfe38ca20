//! Exponential bonding-curve sale
//!
//! Unit `i` (0-based) costs `floor(base · 2^((i + 1) / half_life))`. Pricing a
//! run of `n` units from `total_sold` is a geometric series, so it is
//! evaluated in closed form instead of summing `n` terms:
//!
//! ```text
//! cost = base · 2^((s+1)/H) · (2^(n/H) − 1) / (2^(1/H) − 1)
//! ```
//!
//! The closed form ignores the per-unit floor, which keeps it within
//! `MAX_DIVERGENCE_PPM` of the enumerated sum (see `divergence`).
//!
//! # Example
//!
//! ```
//! use curve_auction::config::CurveConfig;
//! use curve_auction::curve::{BondingCurve, Sale};
//!
//! let sale = Sale::new(BondingCurve::new(CurveConfig::default()).unwrap());
//! let cost = sale.quote(1_000).unwrap();
//! let receipt = sale.buy(1_000, cost).unwrap();
//!
//! assert_eq!(receipt.cost, cost);
//! assert_eq!(sale.total_sold(), 1_000);
//! ```

pub mod divergence; // ground-truth enumeration and tolerance check
pub mod pricer;     // closed-form pricing
pub mod sale;       // total_sold state and buy

pub use divergence::{divergence_ppm, reference_run_cost, within_tolerance, MAX_DIVERGENCE_PPM};
pub use pricer::BondingCurve;
pub use sale::{Purchase, Sale, SaleState};

use crate::config::ConfigError;
use crate::math::MathError;
use thiserror::Error;

/// Curve errors
#[derive(Error, Debug)]
pub enum CurveError {
    #[error("units to buy must be > 0")]
    ZeroUnits,

    #[error("supply exceeded: requested {requested}, remaining {remaining}")]
    SupplyExceeded { requested: u64, remaining: u64 },

    #[error("insufficient payment: cost {cost}, max cost {max_cost}")]
    InsufficientPayment { cost: u128, max_cost: u128 },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("math error: {0}")]
    Math(#[from] MathError),
}
