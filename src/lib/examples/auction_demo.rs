/// Auction demo
///
/// Walks through a curve sale, a sealed-bid ledger and its settlement, then
/// drives the same operations through the async dispatch queue.
///
/// `RUST_LOG=debug cargo run --example auction_demo` shows the log lines.

use curve_auction::config::Config;
use curve_auction::curve::{reference_run_cost, divergence_ppm};
use curve_auction::math::WAD;
use curve_auction::persist::{MemoryRepo, SnapshotRepo};
use curve_auction::{Auction, AuctionGateway, DispatchQueue};
use std::sync::Arc;

#[tokio::main]
async fn main() -> curve_auction::Result<()> {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Bonding curve + sealed-bid auction ===\n");

    curve_demo()?;

    println!("\n{}\n", "=".repeat(60));

    ledger_demo()?;

    println!("\n{}\n", "=".repeat(60));

    settlement_demo()?;

    println!("\n{}\n", "=".repeat(60));

    dispatch_demo().await
}

fn demo_config() -> Config {
    let mut config = Config::default();
    config.auction.total_supply = 1_000 * WAD;
    config
}

fn curve_demo() -> curve_auction::Result<()> {
    println!("1. Curve sale");
    println!("   Pricing runs in closed form...\n");

    let auction = Auction::new(demo_config())?;
    let sale = auction.sale();

    println!("   Spot price: {}", sale.spot_price()?);
    for units in [1_000u64, 100_000, 600_000] {
        let cost = sale.quote(units)?;
        let reference = reference_run_cost(&auction.config().curve, sale.total_sold(), units);
        println!(
            "   {:>7} units: {} (enumerated {}, {} ppm)",
            units,
            cost,
            reference,
            divergence_ppm(cost, reference)
        );
    }

    let purchase = auction.buy(1_000, sale.quote(1_000)?)?;
    println!(
        "\n   Bought {} units for {}, sold {} -> {}",
        purchase.units, purchase.cost, purchase.sold_before, purchase.sold_after
    );
    println!("   Next spot price: {}", sale.spot_price()?);

    match auction.buy(1_000, 1) {
        Ok(_) => println!("   unexpected fill"),
        Err(e) => println!("   Underpaying buy rejected: {}", e),
    }
    Ok(())
}

fn ledger_demo() -> curve_auction::Result<()> {
    println!("2. Sealed-bid ledger");
    println!("   Bids are kept in descending price, ties by arrival...\n");

    let auction = Auction::new(demo_config())?;
    for (price, amount) in [(5, 100), (3, 200), (5, 300), (1, 50)] {
        let id = auction.submit_bid(price * WAD, amount * WAD)?;
        println!("   Submitted #{}: {} @ {}", id, amount, price);
    }

    println!("\n   Head to tail:");
    for bid in auction.book().snapshot() {
        println!("      {}", bid);
    }

    let cancelled = auction.cancel_bid(2)?;
    println!("\n   Cancelled {}", cancelled);
    if let Err(e) = auction.cancel_bid(2) {
        println!("   Cancel again: {}", e);
    }

    let pointers = auction.book().pointers();
    println!("   head #{}, tail #{}", pointers.head, pointers.tail);
    Ok(())
}

fn settlement_demo() -> curve_auction::Result<()> {
    println!("3. Settlement");
    println!("   Supply 1000, bids 400 @ 10, 400 @ 8, 400 @ 5...\n");

    let auction = Auction::new(demo_config())?;
    auction.submit_bid(10 * WAD, 400 * WAD)?;
    auction.submit_bid(8 * WAD, 400 * WAD)?;
    auction.submit_bid(5 * WAD, 400 * WAD)?;

    let result = auction.settle()?;
    println!("   Closing price: {}", result.closing_price / WAD);
    println!("   Boundary bid:  {:?}", result.boundary_bid);
    for fill in &result.fills {
        println!(
            "      #{} filled {} / {}, pays {}, refund {}",
            fill.bid_id,
            fill.filled / WAD,
            fill.amount / WAD,
            fill.cost / WAD,
            fill.refund / WAD
        );
    }
    Ok(())
}

async fn dispatch_demo() -> curve_auction::Result<()> {
    println!("4. Dispatch queue");
    println!("   Same operations through one async worker...\n");

    let config = demo_config();
    let repo = Arc::new(MemoryRepo::new());
    let attached: Arc<dyn SnapshotRepo> = repo.clone();
    let queue = DispatchQueue::spawn(Arc::new(Auction::new(config)?), Some(attached));

    let cost = queue.quote(500).await?;
    queue.buy(500, cost).await?;
    queue.submit_bid(7 * WAD, 600 * WAD).await?;
    queue.submit_bid(9 * WAD, 600 * WAD).await?;
    queue.checkpoint().await?;

    if let Some(state) = repo.load()? {
        println!(
            "   Checkpoint: {} units sold, {} bid records",
            state.sale.total_sold,
            state.book.records.len()
        );
        let restored = Auction::restore(config, &state)?;
        let result = restored.settle()?;
        println!(
            "   Restored auction closes at {} with boundary {:?}",
            result.closing_price / WAD,
            result.boundary_bid
        );
    }

    queue.shutdown().await
}
