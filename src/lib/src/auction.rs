/// One sale plus one sealed-bid ledger, with the configuration they share
///
/// Owns all mutable state for a single auction instance; nothing here is
/// process-global.

use crate::config::Config;
use crate::curve::{BondingCurve, Purchase, Sale};
use crate::error::Result;
use crate::orderbook::{Amount, Bid, BidId, OrderBook, OrderBookError, Price, SharedOrderBook};
use crate::persist::AuctionState;
use crate::settlement::{settle, ClearingResult};

pub struct Auction {
    config: Config,
    sale: Sale,
    book: SharedOrderBook,
}

impl Auction {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let curve = BondingCurve::new(config.curve)?;
        Ok(Self {
            config,
            sale: Sale::new(curve),
            book: SharedOrderBook::new(OrderBook::new(&config.auction)),
        })
    }

    /// Resume from saved state. The book's capacity and bid ceiling must
    /// match the configuration.
    pub fn restore(config: Config, state: &AuctionState) -> Result<Self> {
        config.validate()?;
        let book = &state.book;
        if book.capacity as usize != config.auction.max_bids
            || book.max_bid_amount != config.auction.max_bid_amount
        {
            return Err(OrderBookError::InvalidSnapshot(format!(
                "saved book (capacity {}, ceiling {}) does not match config (capacity {}, ceiling {})",
                book.capacity,
                book.max_bid_amount,
                config.auction.max_bids,
                config.auction.max_bid_amount
            ))
            .into());
        }
        let curve = BondingCurve::new(config.curve)?;
        Ok(Self {
            config,
            sale: Sale::restore(curve, state.sale)?,
            book: SharedOrderBook::new(OrderBook::restore(&state.book)?),
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn sale(&self) -> &Sale {
        &self.sale
    }

    #[inline]
    pub fn book(&self) -> &SharedOrderBook {
        &self.book
    }

    pub fn buy(&self, units: u64, max_cost: u128) -> Result<Purchase> {
        Ok(self.sale.buy(units, max_cost)?)
    }

    pub fn quote(&self, units: u64) -> Result<u128> {
        Ok(self.sale.quote(units)?)
    }

    pub fn submit_bid(&self, max_price: Price, amount: Amount) -> Result<BidId> {
        Ok(self.book.insert(max_price, amount)?)
    }

    pub fn cancel_bid(&self, id: BidId) -> Result<Bid> {
        Ok(self.book.remove(id)?)
    }

    /// Clear the ledger against the configured supply and floor
    pub fn settle(&self) -> Result<ClearingResult> {
        let auction = &self.config.auction;
        let result = self
            .book
            .read(|book| settle(book, auction.total_supply, auction.floor_price))?;
        Ok(result)
    }

    /// Everything that needs persisting
    pub fn state(&self) -> AuctionState {
        let book = self.book.read(|book| book.snapshot());
        AuctionState {
            sale: self.sale.state(),
            book,
        }
    }
}
