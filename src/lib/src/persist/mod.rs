//! Durable auction state
//!
//! What gets stored is exactly the bid table with its head/tail pointers and
//! the sale's `total_sold`. `SnapshotRepo` is the storage seam; the repos
//! here keep it in memory, as JSON, or as fixed-width records.

pub mod file;
pub mod memory;

pub use file::{JsonFileRepo, RecordFileRepo};
pub use memory::MemoryRepo;

use crate::curve::SaleState;
use crate::orderbook::{BookSnapshot, OrderBookError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything needed to resume an auction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    pub sale: SaleState,
    pub book: BookSnapshot,
}

/// Storage for `AuctionState`
pub trait SnapshotRepo: Send + Sync {
    fn save(&self, state: &AuctionState) -> Result<(), PersistError>;

    /// `None` when nothing has been saved yet
    fn load(&self) -> Result<Option<AuctionState>, PersistError>;
}

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt state: {0}")]
    Corrupt(#[from] OrderBookError),
}
