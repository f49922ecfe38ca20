/// Clearing price discovery and per-bid allocation

use super::SettlementError;
use crate::math::{mul_div, to_u128, U256, WAD};
use crate::orderbook::{Amount, BidId, OrderBook, Price};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Allocation for one bid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub bid_id: BidId,
    pub max_price: Price,
    pub amount: Amount,
    pub filled: Amount,
    /// `filled · closing_price / WAD`
    pub cost: u128,
    /// `amount · max_price / WAD − cost`
    pub refund: u128,
}

/// Settlement output, fills in descending-price order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingResult {
    pub closing_price: Price,
    /// Partially filled bid; `None` when supply ran out exactly on a bid
    /// boundary or was never reached
    pub boundary_bid: Option<BidId>,
    pub total_filled: Amount,
    pub fills: Vec<Fill>,
}

impl ClearingResult {
    pub fn fill_for(&self, id: BidId) -> Option<&Fill> {
        self.fills.iter().find(|fill| fill.bid_id == id)
    }

    pub fn total_cost(&self) -> u128 {
        self.fills.iter().map(|fill| fill.cost).sum()
    }

    /// True when no bid received anything
    pub fn is_empty(&self) -> bool {
        self.total_filled == 0
    }
}

/// Settle the ledger against `total_supply`.
///
/// Bids under `floor_price` are skipped. An empty book, one with nothing at
/// or above the floor, or a zero supply closes at `floor_price` with no fills.
pub fn settle(
    book: &OrderBook,
    total_supply: Amount,
    floor_price: Price,
) -> Result<ClearingResult, SettlementError> {
    let mut fills = Vec::with_capacity(book.len());
    let mut total_filled: Amount = 0;
    let mut boundary_bid = None;
    let mut last_filled_price = None;
    let mut supply_met = total_supply == 0;

    for bid in book.iter() {
        let filled = if supply_met || bid.max_price < floor_price {
            0
        } else {
            let remaining = total_supply - total_filled;
            if bid.amount >= remaining {
                supply_met = true;
                if bid.amount > remaining {
                    boundary_bid = Some(bid.id);
                }
                remaining
            } else {
                bid.amount
            }
        };

        if filled > 0 {
            total_filled += filled;
            last_filled_price = Some(bid.max_price);
        }
        fills.push(Fill {
            bid_id: bid.id,
            max_price: bid.max_price,
            amount: bid.amount,
            filled,
            cost: 0,
            refund: 0,
        });
    }

    let closing_price = last_filled_price.unwrap_or(floor_price);

    for fill in &mut fills {
        let escrow = wad_mul(fill.amount, fill.max_price)?;
        fill.cost = wad_mul(fill.filled, closing_price)?;
        fill.refund = escrow.saturating_sub(fill.cost);
    }

    info!(
        closing_price,
        boundary_bid = ?boundary_bid,
        total_filled,
        bids = fills.len(),
        "auction settled"
    );

    Ok(ClearingResult {
        closing_price,
        boundary_bid,
        total_filled,
        fills,
    })
}

/// floor(a · b / WAD)
fn wad_mul(a: u128, b: u128) -> Result<u128, SettlementError> {
    let product = mul_div(U256::from(a), U256::from(b), U256::from(WAD))?;
    Ok(to_u128(product)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with(bids: &[(Price, Amount)]) -> OrderBook {
        let mut book = OrderBook::with_capacity(1_000, u128::MAX);
        for &(price, amount) in bids {
            book.insert(price, amount).unwrap();
        }
        book
    }

    fn filled(result: &ClearingResult) -> Vec<Amount> {
        result.fills.iter().map(|f| f.filled).collect()
    }

    #[test]
    fn test_boundary_bid_partially_filled() {
        let book = book_with(&[(10, 400), (8, 400), (5, 400)]);
        let result = settle(&book, 1_000, 0).unwrap();

        assert_eq!(result.closing_price, 5);
        assert_eq!(result.boundary_bid, Some(2));
        assert_eq!(filled(&result), vec![400, 400, 200]);
        assert_eq!(result.total_filled, 1_000);
    }

    #[test]
    fn test_bids_after_boundary_unfilled() {
        let book = book_with(&[(10, 400), (8, 400), (5, 400), (3, 50), (9, 100)]);
        let result = settle(&book, 1_000, 0).unwrap();

        // descending: 10, 9, 8, 5, 3
        assert_eq!(filled(&result), vec![400, 100, 400, 100, 0]);
        assert_eq!(result.closing_price, 5);
        assert_eq!(result.boundary_bid, Some(2));
        assert_eq!(result.fill_for(3).unwrap().filled, 0);
    }

    #[test]
    fn test_exact_exhaustion_has_no_boundary() {
        let book = book_with(&[(10, 600), (8, 400), (5, 400)]);
        let result = settle(&book, 1_000, 0).unwrap();

        assert_eq!(result.closing_price, 8);
        assert_eq!(result.boundary_bid, None);
        assert_eq!(filled(&result), vec![600, 400, 0]);
    }

    #[test]
    fn test_first_bid_covers_supply() {
        let book = book_with(&[(10, 5_000), (8, 400)]);
        let result = settle(&book, 1_000, 0).unwrap();

        assert_eq!(result.closing_price, 10);
        assert_eq!(result.boundary_bid, Some(0));
        assert_eq!(filled(&result), vec![1_000, 0]);
    }

    #[test]
    fn test_undersubscribed_fills_everyone() {
        let book = book_with(&[(10, 100), (4, 100), (7, 100)]);
        let result = settle(&book, 1_000, 0).unwrap();

        assert_eq!(result.closing_price, 4);
        assert_eq!(result.boundary_bid, None);
        assert_eq!(result.total_filled, 300);
        assert_eq!(filled(&result), vec![100, 100, 100]);
    }

    #[test]
    fn test_empty_book_closes_at_floor() {
        let book = OrderBook::with_capacity(10, u128::MAX);
        let result = settle(&book, 1_000, 3).unwrap();

        assert_eq!(result.closing_price, 3);
        assert_eq!(result.boundary_bid, None);
        assert!(result.fills.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_zero_supply_fills_nothing() {
        let book = book_with(&[(10 * WAD, 5 * WAD), (7 * WAD, WAD)]);
        let result = settle(&book, 0, 3).unwrap();

        assert_eq!(result.closing_price, 3);
        assert_eq!(result.boundary_bid, None);
        assert!(result.is_empty());
        assert_eq!(filled(&result), vec![0, 0]);
        // full escrow comes back
        assert_eq!(result.fill_for(0).unwrap().refund, 50 * WAD);
        assert_eq!(result.fill_for(1).unwrap().refund, 7 * WAD);
    }

    #[test]
    fn test_bids_below_floor_never_filled() {
        let book = book_with(&[(10, 100), (2, 500)]);
        let result = settle(&book, 1_000, 5).unwrap();

        assert_eq!(filled(&result), vec![100, 0]);
        assert_eq!(result.closing_price, 10);

        let book = book_with(&[(2, 500)]);
        let result = settle(&book, 1_000, 5).unwrap();
        assert_eq!(result.closing_price, 5);
        assert!(result.is_empty());
    }

    #[test]
    fn test_uniform_price_costs_and_refunds() {
        let book = book_with(&[(3 * WAD, 2 * WAD), (2 * WAD, 2 * WAD)]);
        let result = settle(&book, 3 * WAD, 0).unwrap();

        assert_eq!(result.closing_price, 2 * WAD);

        let top = result.fill_for(0).unwrap();
        assert_eq!(top.cost, 4 * WAD); // 2 units at 2
        assert_eq!(top.refund, 2 * WAD); // escrow 6

        let boundary = result.fill_for(1).unwrap();
        assert_eq!(boundary.filled, WAD);
        assert_eq!(boundary.cost, 2 * WAD);
        assert_eq!(boundary.refund, 2 * WAD); // escrow 4

        assert_eq!(result.total_cost(), 6 * WAD);
    }

    #[test]
    fn test_cost_overflow_is_an_error() {
        let book = book_with(&[(u128::MAX, u128::MAX)]);
        assert!(matches!(
            settle(&book, u128::MAX, 0),
            Err(SettlementError::Math(_))
        ));
    }
}
