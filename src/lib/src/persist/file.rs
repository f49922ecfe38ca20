/// File-backed snapshot repositories
///
/// Both write to a sibling `.tmp` file and rename over the target, so a
/// crash mid-save leaves the previous snapshot intact.

use super::{AuctionState, PersistError, SnapshotRepo};
use crate::curve::SaleState;
use crate::orderbook::{BookSnapshot, OrderBookError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, PersistError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// `AuctionState` as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonFileRepo {
    path: PathBuf,
}

impl JsonFileRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotRepo for JsonFileRepo {
    fn save(&self, state: &AuctionState) -> Result<(), PersistError> {
        let json = serde_json::to_vec_pretty(state)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), bytes = json.len(), "saved json snapshot");
        Ok(())
    }

    fn load(&self) -> Result<Option<AuctionState>, PersistError> {
        match read_if_exists(&self.path)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

/// `total_sold` as 8 little-endian bytes followed by the book's
/// fixed-width record encoding
#[derive(Debug, Clone)]
pub struct RecordFileRepo {
    path: PathBuf,
}

impl RecordFileRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotRepo for RecordFileRepo {
    fn save(&self, state: &AuctionState) -> Result<(), PersistError> {
        let book = state.book.to_bytes();
        let mut buf = Vec::with_capacity(8 + book.len());
        buf.extend_from_slice(&state.sale.total_sold.to_le_bytes());
        buf.extend_from_slice(&book);
        write_atomic(&self.path, &buf)?;
        debug!(path = %self.path.display(), bytes = buf.len(), "saved record snapshot");
        Ok(())
    }

    fn load(&self) -> Result<Option<AuctionState>, PersistError> {
        let Some(bytes) = read_if_exists(&self.path)? else {
            return Ok(None);
        };
        if bytes.len() < 8 {
            return Err(OrderBookError::InvalidSnapshot("missing sale header".into()).into());
        }
        let mut sold = [0u8; 8];
        sold.copy_from_slice(&bytes[..8]);
        Ok(Some(AuctionState {
            sale: SaleState {
                total_sold: u64::from_le_bytes(sold),
            },
            book: BookSnapshot::from_bytes(&bytes[8..])?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::OrderBook;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch(name: &str) -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "curve_auction_{}_{}_{}",
            std::process::id(),
            n,
            name
        ))
    }

    fn sample_state() -> AuctionState {
        let mut book = OrderBook::with_capacity(16, u128::MAX);
        book.insert(10, 400).unwrap();
        book.insert(8, 400).unwrap();
        let gone = book.insert(9, 1).unwrap();
        book.insert(5, 400).unwrap();
        book.remove(gone).unwrap();
        AuctionState {
            sale: SaleState { total_sold: 1_234 },
            book: book.snapshot(),
        }
    }

    #[test]
    fn test_json_repo_round_trip() {
        let path = scratch("state.json");
        let repo = JsonFileRepo::new(&path);
        assert!(repo.load().unwrap().is_none());

        let state = sample_state();
        repo.save(&state).unwrap();
        assert_eq!(repo.load().unwrap(), Some(state));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_record_repo_round_trip() {
        let path = scratch("state.bin");
        let repo = RecordFileRepo::new(&path);
        assert!(repo.load().unwrap().is_none());

        let state = sample_state();
        repo.save(&state).unwrap();
        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded, state);
        assert!(OrderBook::restore(&loaded.book).is_ok());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_record_repo_rejects_truncated_file() {
        let path = scratch("short.bin");
        fs::write(&path, [1u8, 2, 3]).unwrap();
        let repo = RecordFileRepo::new(&path);
        assert!(matches!(repo.load(), Err(PersistError::Corrupt(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_repo_rejects_garbage() {
        let path = scratch("garbage.json");
        fs::write(&path, b"not json").unwrap();
        let repo = JsonFileRepo::new(&path);
        assert!(matches!(repo.load(), Err(PersistError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
