/// Closed-form bonding-curve pricer
///
/// Pure functions of `total_sold`; the mutable counter lives in `Sale`.

use super::CurveError;
use crate::config::CurveConfig;
use crate::math::{exp2_ratio, mul_div, to_u128, MathError, U256, RAY};

#[derive(Debug, Clone, Copy)]
pub struct BondingCurve {
    config: CurveConfig,
    /// 2^(1/H) − 1, RAY-scaled; the series denominator
    step: U256,
}

impl BondingCurve {
    pub fn new(config: CurveConfig) -> Result<Self, CurveError> {
        config.validate()?;
        let step = exp2_ratio(1, config.half_life_units as u128)? - U256::from(RAY);
        if step.is_zero() {
            // half-life so long that the ratio is indistinguishable from 1
            return Err(MathError::PrecisionUnderflow.into());
        }
        let curve = Self { config, step };
        // every later quote is bounded by the cost of the whole supply
        curve.price_for_run(0, config.total_supply_cap)?;
        Ok(curve)
    }

    #[inline]
    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    /// Units still available after `total_sold`.
    #[inline]
    pub fn remaining(&self, total_sold: u64) -> u64 {
        self.config.total_supply_cap.saturating_sub(total_sold)
    }

    /// Price of the unit at 0-based position `index`.
    pub fn unit_price(&self, index: u64) -> Result<u128, CurveError> {
        let scaled = self.scaled_unit_price(index)?;
        Ok(to_u128(scaled / U256::from(RAY))?)
    }

    /// Total cost of `count` units bought when `total_sold` are already gone.
    pub fn price_for_run(&self, total_sold: u64, count: u64) -> Result<u128, CurveError> {
        if count == 0 {
            return Err(CurveError::ZeroUnits);
        }
        let remaining = self.remaining(total_sold);
        if count > remaining {
            return Err(CurveError::SupplyExceeded {
                requested: count,
                remaining,
            });
        }

        let first = self.scaled_unit_price(total_sold)?;
        let growth =
            exp2_ratio(count as u128, self.config.half_life_units as u128)? - U256::from(RAY);
        let scaled = mul_div(first, growth, self.step)?;
        Ok(to_u128(scaled / U256::from(RAY))?)
    }

    /// Largest number of units whose run cost fits in `budget`.
    ///
    /// Returns 0 when not even one unit is affordable or the supply is gone.
    pub fn units_for_cost(&self, total_sold: u64, budget: u128) -> Result<u64, CurveError> {
        let (mut lo, mut hi) = (0u64, self.remaining(total_sold));
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if self.price_for_run(total_sold, mid)? <= budget {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        Ok(lo)
    }

    /// Token base units represented by `units` curve units.
    pub fn token_amount(&self, units: u64) -> Result<u128, CurveError> {
        (units as u128)
            .checked_mul(self.config.unit_size)
            .ok_or(CurveError::Math(MathError::Overflow))
    }

    /// base · 2^((index+1)/H), RAY-scaled, not floored
    fn scaled_unit_price(&self, index: u64) -> Result<U256, CurveError> {
        let growth = exp2_ratio(index as u128 + 1, self.config.half_life_units as u128)?;
        U256::from(self.config.base_price)
            .checked_mul(growth)
            .ok_or(CurveError::Math(MathError::Overflow))
    }
}
