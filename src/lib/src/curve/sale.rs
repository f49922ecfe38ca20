/// Sale state
///
/// Owns the `total_sold` counter. `buy` is the only mutating entry point and
/// holds the lock across quote, check and advance, so concurrent buyers are
/// linearized and each one is priced against the counter it actually moves.

use super::pricer::BondingCurve;
use super::CurveError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Receipt returned by a successful `buy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub units: u64,
    pub cost: u128,
    /// `units · unit_size`, what the custody layer should transfer
    pub token_amount: u128,
    pub sold_before: u64,
    pub sold_after: u64,
}

/// Persisted part of a sale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleState {
    pub total_sold: u64,
}

pub struct Sale {
    curve: BondingCurve,
    total_sold: Mutex<u64>,
}

impl Sale {
    pub fn new(curve: BondingCurve) -> Self {
        Self {
            curve,
            total_sold: Mutex::new(0),
        }
    }

    /// Resume a sale from persisted state
    pub fn restore(curve: BondingCurve, state: SaleState) -> Result<Self, CurveError> {
        let cap = curve.config().total_supply_cap;
        if state.total_sold > cap {
            return Err(CurveError::SupplyExceeded {
                requested: state.total_sold,
                remaining: cap,
            });
        }
        info!(total_sold = state.total_sold, "sale restored");
        Ok(Self {
            curve,
            total_sold: Mutex::new(state.total_sold),
        })
    }

    #[inline]
    pub fn curve(&self) -> &BondingCurve {
        &self.curve
    }

    #[inline]
    pub fn total_sold(&self) -> u64 {
        *self.total_sold.lock()
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.curve.remaining(self.total_sold())
    }

    pub fn state(&self) -> SaleState {
        SaleState {
            total_sold: self.total_sold(),
        }
    }

    /// Price of the next unit
    pub fn spot_price(&self) -> Result<u128, CurveError> {
        let sold = self.total_sold();
        if self.curve.remaining(sold) == 0 {
            return Err(CurveError::SupplyExceeded {
                requested: 1,
                remaining: 0,
            });
        }
        self.curve.unit_price(sold)
    }

    /// Cost of `units` at the current position. Not a reservation.
    pub fn quote(&self, units: u64) -> Result<u128, CurveError> {
        self.curve.price_for_run(self.total_sold(), units)
    }

    /// Units affordable with `budget` at the current position
    pub fn units_for_cost(&self, budget: u128) -> Result<u64, CurveError> {
        self.curve.units_for_cost(self.total_sold(), budget)
    }

    /// Buy `units`, paying at most `max_cost`.
    ///
    /// On any error `total_sold` is left untouched.
    pub fn buy(&self, units: u64, max_cost: u128) -> Result<Purchase, CurveError> {
        let mut sold = self.total_sold.lock();
        let sold_before = *sold;

        let cost = self.curve.price_for_run(sold_before, units)?;
        if cost > max_cost {
            warn!(units, cost, max_cost, "purchase rejected: insufficient payment");
            return Err(CurveError::InsufficientPayment { cost, max_cost });
        }
        let token_amount = self.curve.token_amount(units)?;

        *sold = sold_before + units;
        debug!(units, cost, sold_after = *sold, "purchase");

        Ok(Purchase {
            units,
            cost,
            token_amount,
            sold_before,
            sold_after: *sold,
        })
    }
}
