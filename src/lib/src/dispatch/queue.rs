/// Single-worker command queue in front of an `Auction`

use super::{AuctionGateway, DispatchError};
use crate::auction::Auction;
use crate::curve::Purchase;
use crate::error::Result;
use crate::orderbook::{Amount, Bid, BidId, Price};
use crate::persist::SnapshotRepo;
use crate::settlement::ClearingResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

type Reply<T> = oneshot::Sender<Result<T>>;

enum Command {
    Buy {
        units: u64,
        max_cost: u128,
        reply: Reply<Purchase>,
    },
    Quote {
        units: u64,
        reply: Reply<u128>,
    },
    SubmitBid {
        max_price: Price,
        amount: Amount,
        reply: Reply<BidId>,
    },
    CancelBid {
        id: BidId,
        reply: Reply<Bid>,
    },
    Settle {
        reply: Reply<ClearingResult>,
    },
    Checkpoint {
        reply: Reply<()>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to the worker; cheap to clone
#[derive(Clone)]
pub struct DispatchQueue {
    tx: mpsc::UnboundedSender<Command>,
    auction: Arc<Auction>,
}

impl DispatchQueue {
    /// Start the worker on the current tokio runtime
    pub fn spawn(auction: Arc<Auction>, repo: Option<Arc<dyn SnapshotRepo>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run(auction.clone(), repo, rx));
        Self { tx, auction }
    }

    /// Direct access for reads that do not need ordering
    pub fn auction(&self) -> &Arc<Auction> {
        &self.auction
    }

    /// Stop accepting commands. Already queued commands are still applied.
    pub async fn shutdown(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Shutdown { reply })
            .map_err(|_| DispatchError::QueueClosed)?;
        rx.await.map_err(|_| DispatchError::ReplyDropped)?;
        Ok(())
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .map_err(|_| DispatchError::QueueClosed)?;
        rx.await.map_err(|_| DispatchError::ReplyDropped)?
    }

    async fn run(
        auction: Arc<Auction>,
        repo: Option<Arc<dyn SnapshotRepo>>,
        mut rx: mpsc::UnboundedReceiver<Command>,
    ) {
        debug!("dispatch worker started");
        while let Some(command) = rx.recv().await {
            match command {
                Command::Buy {
                    units,
                    max_cost,
                    reply,
                } => {
                    let _ = reply.send(auction.buy(units, max_cost));
                }
                Command::Quote { units, reply } => {
                    let _ = reply.send(auction.quote(units));
                }
                Command::SubmitBid {
                    max_price,
                    amount,
                    reply,
                } => {
                    let _ = reply.send(auction.submit_bid(max_price, amount));
                }
                Command::CancelBid { id, reply } => {
                    let _ = reply.send(auction.cancel_bid(id));
                }
                Command::Settle { reply } => {
                    let _ = reply.send(auction.settle());
                }
                Command::Checkpoint { reply } => {
                    let _ = reply.send(Self::checkpoint_with(&auction, repo.as_deref()));
                }
                Command::Shutdown { reply } => {
                    rx.close();
                    let _ = reply.send(());
                }
            }
        }
        info!("dispatch worker stopped");
    }

    fn checkpoint_with(auction: &Auction, repo: Option<&dyn SnapshotRepo>) -> Result<()> {
        let repo = repo.ok_or(DispatchError::NoRepository)?;
        let state = auction.state();
        repo.save(&state)?;
        debug!(
            total_sold = state.sale.total_sold,
            bids = state.book.records.len(),
            "checkpoint saved"
        );
        Ok(())
    }
}

#[async_trait]
impl AuctionGateway for DispatchQueue {
    async fn buy(&self, units: u64, max_cost: u128) -> Result<Purchase> {
        self.request(|reply| Command::Buy {
            units,
            max_cost,
            reply,
        })
        .await
    }

    async fn quote(&self, units: u64) -> Result<u128> {
        self.request(|reply| Command::Quote { units, reply }).await
    }

    async fn submit_bid(&self, max_price: Price, amount: Amount) -> Result<BidId> {
        self.request(|reply| Command::SubmitBid {
            max_price,
            amount,
            reply,
        })
        .await
    }

    async fn cancel_bid(&self, id: BidId) -> Result<Bid> {
        self.request(|reply| Command::CancelBid { id, reply }).await
    }

    async fn settle(&self) -> Result<ClearingResult> {
        self.request(|reply| Command::Settle { reply }).await
    }

    async fn checkpoint(&self) -> Result<()> {
        self.request(|reply| Command::Checkpoint { reply }).await
    }
}
