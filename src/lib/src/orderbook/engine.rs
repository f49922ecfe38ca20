/// Sorted bid ledger
///
/// Doubly linked list of bids in descending price order, stored in a
/// `BidArena`. Equal prices keep arrival order (price-time priority), so the
/// head-to-tail walk is already the fill order used by settlement.

use super::arena::BidArena;
use super::types::{Amount, Bid, BidId, BookPointers, Price, NULL_BID};
use super::OrderBookError;
use crate::config::AuctionConfig;
use tracing::debug;

pub struct OrderBook {
    arena: BidArena,
    pointers: BookPointers,
    /// Live bids
    len: usize,
    /// Per-bid amount ceiling
    max_bid_amount: Amount,
}

impl OrderBook {
    pub fn new(config: &AuctionConfig) -> Self {
        Self::with_capacity(config.max_bids, config.max_bid_amount)
    }

    pub fn with_capacity(max_bids: usize, max_bid_amount: Amount) -> Self {
        Self {
            arena: BidArena::new(max_bids.min(NULL_BID as usize)),
            pointers: BookPointers::default(),
            len: 0,
            max_bid_amount,
        }
    }

    /// Rebuild from parts that were already validated by the restore path
    pub(crate) fn from_parts(
        arena: BidArena,
        pointers: BookPointers,
        len: usize,
        max_bid_amount: Amount,
    ) -> Self {
        Self {
            arena,
            pointers,
            len,
            max_bid_amount,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn pointers(&self) -> BookPointers {
        self.pointers
    }

    #[inline]
    pub fn head(&self) -> Option<&Bid> {
        self.arena.get(self.pointers.head)
    }

    #[inline]
    pub fn tail(&self) -> Option<&Bid> {
        self.arena.get(self.pointers.tail)
    }

    #[inline]
    pub fn highest_price(&self) -> Option<Price> {
        self.head().map(|bid| bid.max_price)
    }

    #[inline]
    pub fn lowest_price(&self) -> Option<Price> {
        self.tail().map(|bid| bid.max_price)
    }

    #[inline]
    pub fn get(&self, id: BidId) -> Option<&Bid> {
        self.arena.get(id)
    }

    #[inline]
    pub fn next_id(&self) -> BidId {
        self.arena.next_id()
    }

    #[inline]
    pub fn max_bid_amount(&self) -> Amount {
        self.max_bid_amount
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub(crate) fn arena(&self) -> &BidArena {
        &self.arena
    }

    /// Sum of live amounts; saturates instead of overflowing
    pub fn total_demand(&self) -> Amount {
        self.iter()
            .fold(0, |acc: Amount, bid| acc.saturating_add(bid.amount))
    }

    /// Insert a bid at its sorted position and return its id.
    ///
    /// The bid goes in front of the first bid with a strictly lower price,
    /// i.e. behind every bid at the same price.
    pub fn insert(&mut self, max_price: Price, amount: Amount) -> Result<BidId, OrderBookError> {
        if max_price == 0 || amount == 0 {
            return Err(OrderBookError::ZeroBid);
        }
        if amount > self.max_bid_amount {
            return Err(OrderBookError::AmountAboveCeiling {
                amount,
                ceiling: self.max_bid_amount,
            });
        }

        // Find the successor before allocating so a full arena leaves no trace.
        // Lowest-price bids are the common case, append those without a walk.
        let successor = match self.tail() {
            None => NULL_BID,
            Some(tail) if tail.max_price >= max_price => NULL_BID,
            Some(_) => self.first_below(max_price),
        };

        let id = self
            .arena
            .allocate(max_price, amount)
            .ok_or(OrderBookError::CapacityExceeded(self.arena.capacity()))?;
        self.link_before(id, successor);
        self.len += 1;

        debug!(id, max_price, amount, "bid inserted");
        Ok(id)
    }

    /// Unlink a live bid
    pub fn remove(&mut self, id: BidId) -> Result<Bid, OrderBookError> {
        let bid = self.arena.retire(id).ok_or(OrderBookError::NotFound(id))?;

        match self.arena.get_mut(bid.prev) {
            Some(prev) => prev.next = bid.next,
            None => self.pointers.head = bid.next,
        }
        match self.arena.get_mut(bid.next) {
            Some(next) => next.prev = bid.prev,
            None => self.pointers.tail = bid.prev,
        }
        self.len -= 1;

        debug!(id, "bid removed");
        Ok(bid)
    }

    /// Head-to-tail traversal, highest price first
    #[inline]
    pub fn iter(&self) -> Descending<'_> {
        Descending {
            arena: &self.arena,
            cursor: self.pointers.head,
        }
    }

    /// Tail-to-head traversal, lowest price first
    #[inline]
    pub fn iter_rev(&self) -> Ascending<'_> {
        Ascending {
            arena: &self.arena,
            cursor: self.pointers.tail,
        }
    }

    /// Owned copy of the list in descending order
    pub fn to_vec(&self) -> Vec<Bid> {
        self.iter().copied().collect()
    }

    /// First bid (from the head) whose price is strictly below `price`
    fn first_below(&self, price: Price) -> BidId {
        self.iter()
            .find(|bid| bid.max_price < price)
            .map_or(NULL_BID, |bid| bid.id)
    }

    /// Splice the freshly allocated `id` in front of `successor`
    /// (`NULL_BID` appends at the tail)
    fn link_before(&mut self, id: BidId, successor: BidId) {
        let prev = match self.arena.get(successor) {
            Some(next) => next.prev,
            None => self.pointers.tail,
        };

        if let Some(bid) = self.arena.get_mut(id) {
            bid.prev = prev;
            bid.next = successor;
        }
        match self.arena.get_mut(prev) {
            Some(p) => p.next = id,
            None => self.pointers.head = id,
        }
        match self.arena.get_mut(successor) {
            Some(n) => n.prev = id,
            None => self.pointers.tail = id,
        }
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new(&AuctionConfig::default())
    }
}

/// Lazy head-to-tail iterator
pub struct Descending<'a> {
    arena: &'a BidArena,
    cursor: BidId,
}

impl<'a> Iterator for Descending<'a> {
    type Item = &'a Bid;

    fn next(&mut self) -> Option<Self::Item> {
        let bid = self.arena.get(self.cursor)?;
        self.cursor = bid.next;
        Some(bid)
    }
}

/// Lazy tail-to-head iterator
pub struct Ascending<'a> {
    arena: &'a BidArena,
    cursor: BidId,
}

impl<'a> Iterator for Ascending<'a> {
    type Item = &'a Bid;

    fn next(&mut self) -> Option<Self::Item> {
        let bid = self.arena.get(self.cursor)?;
        self.cursor = bid.prev;
        Some(bid)
    }
}
