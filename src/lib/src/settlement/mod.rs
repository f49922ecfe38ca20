//! Auction settlement
//!
//! One pass over the ledger from the head. Demand is accumulated against
//! the supply until it is met; the bid where that happens sets the closing
//! price and, if it overshoots, is filled only up to the remaining supply.
//! Everyone pays the closing price and gets back the rest of their escrow
//! (`amount · max_price`).

pub mod clearing;

pub use clearing::{settle, ClearingResult, Fill};

use crate::math::MathError;
use thiserror::Error;

/// Settlement errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("math error: {0}")]
    Math(#[from] MathError),
}
