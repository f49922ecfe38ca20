/// Shared order book handle
///
/// One writer at a time, any number of readers. Splices happen entirely
/// under the write lock, so readers only ever see fully linked lists.

use super::engine::OrderBook;
use super::types::{Amount, Bid, BidId, BookPointers, Price};
use super::OrderBookError;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Clone)]
pub struct SharedOrderBook {
    inner: Arc<RwLock<OrderBook>>,
}

impl SharedOrderBook {
    pub fn new(book: OrderBook) -> Self {
        Self {
            inner: Arc::new(RwLock::new(book)),
        }
    }

    pub fn insert(&self, max_price: Price, amount: Amount) -> Result<BidId, OrderBookError> {
        self.inner.write().insert(max_price, amount)
    }

    pub fn remove(&self, id: BidId) -> Result<Bid, OrderBookError> {
        self.inner.write().remove(id)
    }

    /// Descending copy taken under one read lock
    pub fn snapshot(&self) -> Vec<Bid> {
        self.inner.read().to_vec()
    }

    pub fn get(&self, id: BidId) -> Option<Bid> {
        self.inner.read().get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn pointers(&self) -> BookPointers {
        self.inner.read().pointers()
    }

    /// Run `f` against a consistent view of the book
    pub fn read<R>(&self, f: impl FnOnce(&OrderBook) -> R) -> R {
        f(&self.inner.read())
    }
}
