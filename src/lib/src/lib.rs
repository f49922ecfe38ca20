//! Token launch primitives: an exponential bonding-curve sale priced in
//! closed form, and a price-ordered sealed-bid ledger with uniform-price
//! settlement.

pub mod auction;
pub mod config;
pub mod curve;
pub mod dispatch;
pub mod error;
pub mod math;
pub mod orderbook;
pub mod persist;
pub mod settlement;

pub use auction::Auction;
pub use config::Config;
pub use dispatch::{AuctionGateway, DispatchQueue};
pub use error::{Error, Result};
