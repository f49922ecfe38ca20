use curve_auction::config::Config;
use curve_auction::curve::{divergence_ppm, reference_run_cost, CurveError};
use curve_auction::math::WAD;
use curve_auction::orderbook::{BidId, OrderBookError, NULL_BID};
use curve_auction::persist::{JsonFileRepo, RecordFileRepo, SnapshotRepo};
use curve_auction::{Auction, Error};
use std::path::PathBuf;

fn auction_with(total_supply: u128, floor_price: u128, max_bids: usize) -> Auction {
    let mut config = Config::default();
    config.auction.total_supply = total_supply;
    config.auction.floor_price = floor_price;
    config.auction.max_bids = max_bids;
    Auction::new(config).unwrap()
}

fn order(auction: &Auction) -> Vec<BidId> {
    auction.book().snapshot().iter().map(|bid| bid.id).collect()
}

#[test]
fn equal_prices_keep_arrival_order() {
    let auction = auction_with(WAD, 0, 16);
    for price in [5, 3, 5, 1] {
        auction.submit_bid(price, 1).unwrap();
    }
    assert_eq!(order(&auction), vec![0, 2, 1, 3]);
}

#[test]
fn three_bid_clearing() {
    let auction = auction_with(1_000, 0, 16);
    auction.submit_bid(10, 400).unwrap();
    auction.submit_bid(8, 400).unwrap();
    let boundary = auction.submit_bid(5, 400).unwrap();

    let result = auction.settle().unwrap();
    assert_eq!(result.closing_price, 5);
    assert_eq!(result.boundary_bid, Some(boundary));
    assert_eq!(result.fill_for(0).unwrap().filled, 400);
    assert_eq!(result.fill_for(1).unwrap().filled, 400);
    assert_eq!(result.fill_for(boundary).unwrap().filled, 200);
}

#[test]
fn first_thousand_units_match_enumeration() {
    let auction = auction_with(WAD, 0, 16);
    let closed = auction.quote(1_000).unwrap();
    let reference = reference_run_cost(&auction.config().curve, 0, 1_000);

    assert_eq!(reference, 600_207_700);
    assert!(divergence_ppm(closed, reference) <= 100);
}

#[test]
fn highest_bid_alone_covers_supply() {
    let auction = auction_with(1_000, 0, 16);
    auction.submit_bid(3, 500).unwrap();
    let top = auction.submit_bid(9, 5_000).unwrap();

    let result = auction.settle().unwrap();
    assert_eq!(auction.book().pointers().head, top);
    assert_eq!(result.boundary_bid, Some(top));
    assert_eq!(result.closing_price, 9);
    assert_eq!(result.total_filled, 1_000);
}

#[test]
fn undersubscribed_auction_respects_floor() {
    let auction = auction_with(1_000, 4, 16);
    auction.submit_bid(10, 100).unwrap();
    auction.submit_bid(6, 100).unwrap();
    auction.submit_bid(2, 100).unwrap();

    let result = auction.settle().unwrap();
    assert_eq!(result.closing_price, 6);
    assert_eq!(result.boundary_bid, None);
    assert_eq!(result.total_filled, 200);
    assert_eq!(result.fill_for(2).unwrap().filled, 0);
}

#[test]
fn cancelled_bids_leave_the_clearing() {
    let auction = auction_with(1_000, 0, 16);
    let top = auction.submit_bid(10, 900).unwrap();
    auction.submit_bid(8, 400).unwrap();
    auction.cancel_bid(top).unwrap();

    let result = auction.settle().unwrap();
    assert_eq!(result.closing_price, 8);
    assert!(result.fill_for(top).is_none());
    assert!(matches!(
        auction.cancel_bid(top),
        Err(Error::OrderBook(OrderBookError::NotFound(_)))
    ));
}

#[test]
fn full_book_rejects_new_bids() {
    let auction = auction_with(1_000, 0, 2);
    auction.submit_bid(1, 1).unwrap();
    auction.submit_bid(2, 1).unwrap();
    assert!(matches!(
        auction.submit_bid(3, 1),
        Err(Error::OrderBook(OrderBookError::CapacityExceeded(2)))
    ));
    assert_eq!(auction.book().len(), 2);
}

#[test]
fn empty_book_has_null_pointers() {
    let auction = auction_with(1_000, 7, 4);
    let pointers = auction.book().pointers();
    assert_eq!(pointers.head, NULL_BID);
    assert_eq!(pointers.tail, NULL_BID);

    let result = auction.settle().unwrap();
    assert_eq!(result.closing_price, 7);
    assert!(result.is_empty());
}

#[test]
fn purchases_are_path_dependent() {
    let auction = auction_with(WAD, 0, 4);
    let first = auction.buy(10_000, u128::MAX).unwrap();
    let second = auction.buy(10_000, u128::MAX).unwrap();

    assert!(second.cost > first.cost);
    assert_eq!(second.sold_before, 10_000);
    assert_eq!(auction.sale().total_sold(), 20_000);
}

#[test]
fn buying_past_the_cap_is_rejected() {
    let auction = auction_with(WAD, 0, 4);
    auction.buy(11_999_000, u128::MAX).unwrap();
    assert!(matches!(
        auction.buy(1_001, u128::MAX),
        Err(Error::Curve(CurveError::SupplyExceeded {
            requested: 1_001,
            remaining: 1_000
        }))
    ));
    auction.buy(1_000, u128::MAX).unwrap();
    assert_eq!(auction.sale().remaining(), 0);
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("curve_auction_it_{}_{}", std::process::id(), name))
}

#[test]
fn state_survives_file_round_trips() {
    let auction = auction_with(1_000, 0, 16);
    auction.buy(777, u128::MAX).unwrap();
    auction.submit_bid(10, 400).unwrap();
    let gone = auction.submit_bid(9, 400).unwrap();
    auction.submit_bid(5, 400).unwrap();
    auction.cancel_bid(gone).unwrap();

    let json = JsonFileRepo::new(scratch("state.json"));
    let records = RecordFileRepo::new(scratch("state.bin"));
    let repos: [&dyn SnapshotRepo; 2] = [&json, &records];

    for repo in repos {
        repo.save(&auction.state()).unwrap();
        let state = repo.load().unwrap().unwrap();
        let restored = Auction::restore(*auction.config(), &state).unwrap();

        assert_eq!(restored.sale().total_sold(), 777);
        assert_eq!(order(&restored), order(&auction));
        assert_eq!(restored.settle().unwrap(), auction.settle().unwrap());

        // ids keep counting from where the saved book stopped
        assert_eq!(restored.submit_bid(1, 1).unwrap(), 3);
    }

    let _ = std::fs::remove_file(json.path());
    let _ = std::fs::remove_file(records.path());
}
