/// Ground-truth enumeration and the divergence check
///
/// The reference walks every unit and sums the floored per-unit prices in
/// double precision, the way the sale was modelled before the closed form.
/// It is O(count) and only meant for verification.

use crate::config::CurveConfig;

/// 0.01%
pub const MAX_DIVERGENCE_PPM: u128 = 100;

const PPM: u128 = 1_000_000;

/// floor(base · 2^((index+1)/H)), in f64
pub fn reference_unit_price(config: &CurveConfig, index: u64) -> u128 {
    let exponent = (index as f64 + 1.0) / config.half_life_units as f64;
    (config.base_price as f64 * exponent.exp2()).floor() as u128
}

/// Sum of `reference_unit_price` over `[total_sold, total_sold + count)`
pub fn reference_run_cost(config: &CurveConfig, total_sold: u64, count: u64) -> u128 {
    (total_sold..total_sold + count)
        .map(|index| reference_unit_price(config, index))
        .sum()
}

/// |actual − expected| in parts per million of `max(1, expected)`
pub fn divergence_ppm(actual: u128, expected: u128) -> u128 {
    actual.abs_diff(expected).saturating_mul(PPM) / expected.max(1)
}

#[inline]
pub fn within_tolerance(actual: u128, expected: u128, max_ppm: u128) -> bool {
    divergence_ppm(actual, expected) <= max_ppm
}
