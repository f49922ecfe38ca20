//! Async front door
//!
//! `AuctionGateway` is what a network or RPC layer would call.
//! `DispatchQueue` funnels every request through one worker task so
//! mutations are applied in the order they arrive.

pub mod queue;

pub use queue::DispatchQueue;

use crate::curve::Purchase;
use crate::error::Result;
use crate::orderbook::{Amount, Bid, BidId, Price};
use crate::settlement::ClearingResult;
use async_trait::async_trait;
use thiserror::Error;

/// Auction operations exposed to async callers
#[async_trait]
pub trait AuctionGateway: Send + Sync {
    /// Buy `units` from the curve, paying at most `max_cost`
    async fn buy(&self, units: u64, max_cost: u128) -> Result<Purchase>;

    /// Cost of the next `units` without buying
    async fn quote(&self, units: u64) -> Result<u128>;

    async fn submit_bid(&self, max_price: Price, amount: Amount) -> Result<BidId>;

    async fn cancel_bid(&self, id: BidId) -> Result<Bid>;

    async fn settle(&self) -> Result<ClearingResult>;

    /// Persist the current state
    async fn checkpoint(&self) -> Result<()>;
}

/// Dispatch errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("dispatch queue closed")]
    QueueClosed,

    #[error("worker dropped the reply")]
    ReplyDropped,

    #[error("no snapshot repository attached")]
    NoRepository,
}
