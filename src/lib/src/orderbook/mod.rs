//! Sealed-bid ledger
//!
//! Bids are kept in a doubly linked list ordered by descending price with
//! price-time priority:
//! - nodes live in a fixed-capacity arena, links are `u32` ids
//! - `NULL_BID` terminates both ends
//! - insertion splices at the sorted position, removal relinks neighbours
//! - traversal from either end is lazy and restartable
//!
//! # Example
//!
//! ```
//! use curve_auction::orderbook::*;
//!
//! let mut book = OrderBook::with_capacity(16, u128::MAX);
//! for price in [5, 3, 5, 1] {
//!     book.insert(price, 1).unwrap();
//! }
//!
//! let order: Vec<BidId> = book.iter().map(|bid| bid.id).collect();
//! assert_eq!(order, vec![0, 2, 1, 3]);
//! ```

pub mod arena;  // slot storage
pub mod engine; // sorted list
pub mod record; // persisted form
pub mod shared; // lock-guarded handle
pub mod types;  // Bid, ids, pointers

pub use engine::{Ascending, Descending, OrderBook};
pub use record::{BidRecord, BookSnapshot};
pub use shared::SharedOrderBook;
pub use types::{Amount, Bid, BidId, BookPointers, Price, NULL_BID};

use thiserror::Error;

/// Order book errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    #[error("bid price and amount must be > 0")]
    ZeroBid,

    #[error("bid amount {amount} above ceiling {ceiling}")]
    AmountAboveCeiling { amount: Amount, ceiling: Amount },

    #[error("order book full ({0} bids)")]
    CapacityExceeded(usize),

    #[error("bid {0} not found")]
    NotFound(BidId),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
