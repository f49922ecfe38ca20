use curve_auction::config::CurveConfig;
use curve_auction::curve::{
    reference_run_cost, within_tolerance, BondingCurve, Sale, MAX_DIVERGENCE_PPM,
};
use curve_auction::math::WAD;
use curve_auction::orderbook::{Amount, BidId, OrderBook, Price};
use curve_auction::settlement::settle;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(Price, Amount),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1u128..20, 1u128..1_000).prop_map(|(p, a)| Op::Insert(p, a)),
        1 => any::<usize>().prop_map(Op::Remove),
    ]
}

fn apply(ops: &[Op]) -> OrderBook {
    let mut book = OrderBook::with_capacity(1_024, u128::MAX);
    let mut live: Vec<BidId> = Vec::new();
    for op in ops {
        match *op {
            Op::Insert(price, amount) => live.push(book.insert(price, amount).unwrap()),
            Op::Remove(pick) if !live.is_empty() => {
                let id = live.swap_remove(pick % live.len());
                book.remove(id).unwrap();
            }
            Op::Remove(_) => {}
        }
    }
    assert_eq!(book.len(), live.len());
    book
}

fn curve() -> BondingCurve {
    BondingCurve::new(CurveConfig::default()).unwrap()
}

proptest! {
    #[test]
    fn traversal_is_sorted_with_time_priority(ops in prop::collection::vec(op(), 0..200)) {
        let book = apply(&ops);
        let bids = book.to_vec();
        prop_assert_eq!(bids.len(), book.len());
        for pair in bids.windows(2) {
            prop_assert!(pair[0].max_price >= pair[1].max_price);
            if pair[0].max_price == pair[1].max_price {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    #[test]
    fn traversal_is_restartable_from_either_end(ops in prop::collection::vec(op(), 0..100)) {
        let book = apply(&ops);
        let forward: Vec<BidId> = book.iter().map(|bid| bid.id).collect();
        let again: Vec<BidId> = book.iter().map(|bid| bid.id).collect();
        let mut backward: Vec<BidId> = book.iter_rev().map(|bid| bid.id).collect();
        backward.reverse();

        prop_assert_eq!(&forward, &again);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(book.head().map(|bid| bid.id), forward.first().copied());
        prop_assert_eq!(book.tail().map(|bid| bid.id), forward.last().copied());
    }

    #[test]
    fn settlement_conserves_supply(
        bids in prop::collection::vec((1u128..1_000, 1u128..1_000_000), 0..60),
        supply in 1u128..20_000_000,
    ) {
        let mut book = OrderBook::with_capacity(64, u128::MAX);
        for &(price, amount) in &bids {
            book.insert(price * WAD, amount * WAD).unwrap();
        }
        let supply = supply * WAD;
        let result = settle(&book, supply, 0).unwrap();

        let filled: Amount = result.fills.iter().map(|fill| fill.filled).sum();
        prop_assert_eq!(filled, result.total_filled);
        prop_assert_eq!(result.total_filled, supply.min(book.total_demand()));

        let partial = result
            .fills
            .iter()
            .filter(|fill| fill.filled > 0 && fill.filled < fill.amount)
            .count();
        prop_assert!(partial <= 1);

        let mut seen_unfilled = false;
        for fill in &result.fills {
            prop_assert!(fill.filled <= fill.amount);
            if fill.filled > 0 {
                prop_assert!(!seen_unfilled);
                prop_assert!(fill.max_price >= result.closing_price);
            } else {
                seen_unfilled = true;
            }
            let escrow = (fill.amount / WAD) * (fill.max_price / WAD) * WAD;
            prop_assert_eq!(fill.cost + fill.refund, escrow);
        }
    }

    #[test]
    fn run_cost_grows_with_size_and_position(
        sold in 0u64..11_000_000,
        count in 1u64..500_000,
    ) {
        let curve = curve();
        let base = curve.price_for_run(sold, count).unwrap();
        prop_assert!(curve.price_for_run(sold, count + 1).unwrap() > base);
        prop_assert!(curve.price_for_run(sold + 1, count).unwrap() >= base);
    }

    #[test]
    fn split_purchases_cost_the_same(
        sold in 0u64..10_000_000,
        first in 1u64..500_000,
        second in 1u64..500_000,
    ) {
        let curve = curve();
        let whole = curve.price_for_run(sold, first + second).unwrap();
        let split = curve.price_for_run(sold, first).unwrap()
            + curve.price_for_run(sold + first, second).unwrap();
        prop_assert!(whole.abs_diff(split) <= 4);
    }

    #[test]
    fn sales_never_exceed_the_cap(buys in prop::collection::vec(1u64..3_000, 1..20)) {
        let config = CurveConfig { total_supply_cap: 10_000, ..CurveConfig::default() };
        let sale = Sale::new(BondingCurve::new(config).unwrap());
        let mut accepted = 0u64;
        for units in buys {
            if sale.buy(units, u128::MAX).is_ok() {
                accepted += units;
            }
            prop_assert!(sale.total_sold() <= 10_000);
        }
        prop_assert_eq!(sale.total_sold(), accepted);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn closed_form_stays_within_tolerance(
        sold in 0u64..12_000_000,
        count in 1u64..=600_000,
    ) {
        let curve = curve();
        let count = count.min(curve.remaining(sold));

        let closed = curve.price_for_run(sold, count).unwrap();
        let reference = reference_run_cost(curve.config(), sold, count);
        prop_assert!(
            within_tolerance(closed, reference, MAX_DIVERGENCE_PPM),
            "closed {} vs enumerated {}",
            closed,
            reference
        );
    }
}

#[test]
fn closed_form_tolerance_at_the_end_of_supply() {
    let curve = curve();
    let sold = 12_000_000 - 600_000;
    let closed = curve.price_for_run(sold, 600_000).unwrap();
    let reference = reference_run_cost(curve.config(), sold, 600_000);
    assert!(within_tolerance(closed, reference, MAX_DIVERGENCE_PPM));
}
