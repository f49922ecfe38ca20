//! Sale and auction configuration.
//!
//! Loaded from JSON; every field has a default so partial files work:
//!
//! ```json
//! {
//!   "curve":   { "base_price": 600000, "half_life_units": 1000000 },
//!   "auction": { "total_supply": 10000000000000000000000 }
//! }
//! ```

use crate::math::{MAX_WHOLE_EXPONENT, WAD};
use crate::orderbook::types::{Amount, Price, NULL_BID};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Bonding-curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Price of the first unit, in payment-token base units
    pub base_price: u128,
    /// Units after which the unit price doubles
    pub half_life_units: u64,
    /// Units that can ever be sold
    pub total_supply_cap: u64,
    /// Token base units per curve unit (10^18 = one whole 18-decimal token)
    pub unit_size: u128,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            base_price: 600_000,
            half_life_units: 1_000_000,
            total_supply_cap: 12_000_000,
            unit_size: WAD,
        }
    }
}

impl CurveConfig {
    /// The closed form skips the per-unit floor, which loses under one price
    /// unit per curve unit; at this base price that is at most 100 ppm.
    pub const MIN_BASE_PRICE: u128 = 10_000;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_price < Self::MIN_BASE_PRICE {
            return Err(ConfigError::Invalid(format!(
                "curve.base_price must be >= {}",
                Self::MIN_BASE_PRICE
            )));
        }
        if self.half_life_units == 0 {
            return Err(ConfigError::Invalid("curve.half_life_units must be > 0".into()));
        }
        if self.total_supply_cap == 0 {
            return Err(ConfigError::Invalid("curve.total_supply_cap must be > 0".into()));
        }
        if self.unit_size == 0 {
            return Err(ConfigError::Invalid("curve.unit_size must be > 0".into()));
        }
        if (self.total_supply_cap / self.half_life_units) as u128 > MAX_WHOLE_EXPONENT {
            return Err(ConfigError::Invalid(format!(
                "curve.total_supply_cap spans more than {} half-lives",
                MAX_WHOLE_EXPONENT
            )));
        }
        Ok(())
    }
}

/// Sealed-bid auction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Units on offer, WAD-scaled
    pub total_supply: Amount,
    /// Reserve price; bids below it are never filled
    pub floor_price: Price,
    /// Largest amount a single bid may ask for
    pub max_bid_amount: Amount,
    /// Arena capacity, i.e. the number of ids that can ever be issued
    pub max_bids: usize,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            total_supply: 10_000 * WAD,
            floor_price: 0,
            max_bid_amount: (1u128 << 96) - 1,
            max_bids: 100_000,
        }
    }
}

impl AuctionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_supply == 0 {
            return Err(ConfigError::Invalid("auction.total_supply must be > 0".into()));
        }
        if self.max_bid_amount == 0 {
            return Err(ConfigError::Invalid("auction.max_bid_amount must be > 0".into()));
        }
        if self.max_bids == 0 || self.max_bids >= NULL_BID as usize {
            return Err(ConfigError::Invalid(format!(
                "auction.max_bids must be in 1..{}",
                NULL_BID
            )));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub curve: CurveConfig,
    pub auction: AuctionConfig,
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.curve.validate()?;
        self.auction.validate()
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
