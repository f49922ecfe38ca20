use super::{AuctionState, PersistError, SnapshotRepo};
use parking_lot::Mutex;

/// Keeps the last saved state in process memory
#[derive(Debug, Default)]
pub struct MemoryRepo {
    slot: Mutex<Option<AuctionState>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotRepo for MemoryRepo {
    fn save(&self, state: &AuctionState) -> Result<(), PersistError> {
        *self.slot.lock() = Some(state.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<AuctionState>, PersistError> {
        Ok(self.slot.lock().clone())
    }
}
