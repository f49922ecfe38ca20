/// Bid ledger types
///
/// Prices and amounts are 18-decimal fixed-point integers; ids are dense
/// `u32` arena indices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bid identifier, also the arena index
pub type BidId = u32;

/// Reserved "no neighbour" link value
pub const NULL_BID: BidId = BidId::MAX;

/// Unit price, WAD-scaled
pub type Price = u128;

/// Quantity, WAD-scaled
pub type Amount = u128;

/// A sealed bid and its position in the descending-price list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub max_price: Price,
    pub amount: Amount,
    /// Neighbour towards the head (higher or equal price, earlier id)
    pub prev: BidId,
    /// Neighbour towards the tail
    pub next: BidId,
}

impl Bid {
    #[inline]
    pub fn new(id: BidId, max_price: Price, amount: Amount) -> Self {
        Self {
            id,
            max_price,
            amount,
            prev: NULL_BID,
            next: NULL_BID,
        }
    }

    #[inline]
    pub fn is_head(&self) -> bool {
        self.prev == NULL_BID
    }

    #[inline]
    pub fn is_tail(&self) -> bool {
        self.next == NULL_BID
    }

    /// True when `self` must sit closer to the head than `other`
    #[inline]
    pub fn outranks(&self, other: &Bid) -> bool {
        self.max_price > other.max_price
            || (self.max_price == other.max_price && self.id < other.id)
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BID #{} {} @ {}", self.id, self.amount, self.max_price)
    }
}

/// Ends of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPointers {
    pub head: BidId,
    pub tail: BidId,
}

impl Default for BookPointers {
    fn default() -> Self {
        Self {
            head: NULL_BID,
            tail: NULL_BID,
        }
    }
}

impl BookPointers {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == NULL_BID
    }
}
