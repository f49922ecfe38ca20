/// Persisted form of the ledger
///
/// The bid table is stored as fixed-width little-endian records keyed by id,
/// removed bids included so ids stay dense:
///
/// ```text
/// record: [id u32][max_price u128][amount u128][prev u32][next u32][live u8]  = 45 bytes
/// table:  [head u32][tail u32][capacity u32][ceiling u128][count u32][record; count]
/// ```

use super::arena::BidArena;
use super::engine::OrderBook;
use super::types::{Amount, Bid, BidId, BookPointers, Price, NULL_BID};
use super::OrderBookError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One row of the bid table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub id: BidId,
    pub max_price: Price,
    pub amount: Amount,
    pub prev: BidId,
    pub next: BidId,
    pub live: bool,
}

impl BidRecord {
    pub const LEN: usize = 4 + 16 + 16 + 4 + 4 + 1;

    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        buf[0..4].copy_from_slice(&self.id.to_le_bytes());
        buf[4..20].copy_from_slice(&self.max_price.to_le_bytes());
        buf[20..36].copy_from_slice(&self.amount.to_le_bytes());
        buf[36..40].copy_from_slice(&self.prev.to_le_bytes());
        buf[40..44].copy_from_slice(&self.next.to_le_bytes());
        buf[44] = self.live as u8;
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self, OrderBookError> {
        if buf.len() != Self::LEN {
            return Err(OrderBookError::InvalidSnapshot(format!(
                "record is {} bytes, expected {}",
                buf.len(),
                Self::LEN
            )));
        }
        let live = match buf[44] {
            0 => false,
            1 => true,
            other => {
                return Err(OrderBookError::InvalidSnapshot(format!(
                    "bad live flag {}",
                    other
                )));
            }
        };
        Ok(Self {
            id: read_u32(&buf[0..4]),
            max_price: read_u128(&buf[4..20]),
            amount: read_u128(&buf[20..36]),
            prev: read_u32(&buf[36..40]),
            next: read_u32(&buf[40..44]),
            live,
        })
    }

    fn bid(&self) -> Bid {
        Bid {
            id: self.id,
            max_price: self.max_price,
            amount: self.amount,
            prev: self.prev,
            next: self.next,
        }
    }
}

/// Everything needed to rebuild an `OrderBook`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub head: BidId,
    pub tail: BidId,
    pub capacity: u32,
    pub max_bid_amount: Amount,
    pub records: Vec<BidRecord>,
}

const HEADER_LEN: usize = 4 + 4 + 4 + 16 + 4;

impl BookSnapshot {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.records.len() * BidRecord::LEN);
        buf.extend_from_slice(&self.head.to_le_bytes());
        buf.extend_from_slice(&self.tail.to_le_bytes());
        buf.extend_from_slice(&self.capacity.to_le_bytes());
        buf.extend_from_slice(&self.max_bid_amount.to_le_bytes());
        buf.extend_from_slice(&(self.records.len() as u32).to_le_bytes());
        for record in &self.records {
            buf.extend_from_slice(&record.encode());
        }
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, OrderBookError> {
        if buf.len() < HEADER_LEN {
            return Err(OrderBookError::InvalidSnapshot("truncated header".into()));
        }
        let count = read_u32(&buf[28..32]) as usize;
        let body = &buf[HEADER_LEN..];
        if body.len() != count * BidRecord::LEN {
            return Err(OrderBookError::InvalidSnapshot(format!(
                "expected {} records, found {} bytes",
                count,
                body.len()
            )));
        }
        let records = body
            .chunks_exact(BidRecord::LEN)
            .map(BidRecord::decode)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            head: read_u32(&buf[0..4]),
            tail: read_u32(&buf[4..8]),
            capacity: read_u32(&buf[8..12]),
            max_bid_amount: read_u128(&buf[12..28]),
            records,
        })
    }
}

impl OrderBook {
    /// Capture the bid table and pointers
    pub fn snapshot(&self) -> BookSnapshot {
        let pointers = self.pointers();
        BookSnapshot {
            head: pointers.head,
            tail: pointers.tail,
            capacity: self.capacity() as u32,
            max_bid_amount: self.max_bid_amount(),
            records: self
                .arena()
                .slots()
                .map(|(bid, live)| BidRecord {
                    id: bid.id,
                    max_price: bid.max_price,
                    amount: bid.amount,
                    prev: bid.prev,
                    next: bid.next,
                    live,
                })
                .collect(),
        }
    }

    /// Rebuild a book, checking links, ordering and pointers
    pub fn restore(snapshot: &BookSnapshot) -> Result<Self, OrderBookError> {
        let invalid = |msg: String| Err(OrderBookError::InvalidSnapshot(msg));

        let capacity = snapshot.capacity as usize;
        if capacity >= NULL_BID as usize || snapshot.records.len() > capacity {
            return invalid(format!(
                "{} records do not fit capacity {}",
                snapshot.records.len(),
                capacity
            ));
        }

        let mut arena = BidArena::new(capacity);
        let mut live_count = 0usize;
        for record in &snapshot.records {
            if record.live {
                if record.max_price == 0 || record.amount == 0 {
                    return invalid(format!("bid {} is zero", record.id));
                }
                if record.amount > snapshot.max_bid_amount {
                    return invalid(format!("bid {} above ceiling", record.id));
                }
                live_count += 1;
            }
            if arena.push_raw(record.bid(), record.live).is_none() {
                return invalid(format!("record id {} out of sequence", record.id));
            }
        }

        // Walk head to tail; bounded by live_count so a cycle cannot spin
        let mut seen = 0usize;
        let mut prev: Option<&Bid> = None;
        let mut cursor = snapshot.head;
        while cursor != NULL_BID {
            let Some(bid) = arena.get(cursor) else {
                return invalid(format!("link to missing bid {}", cursor));
            };
            seen += 1;
            if seen > live_count {
                return invalid("cycle in bid links".into());
            }
            match prev {
                Some(p) if bid.prev != p.id || !p.outranks(bid) => {
                    return invalid(format!("bid {} out of order", bid.id));
                }
                None if bid.prev != NULL_BID => {
                    return invalid(format!("head {} has a predecessor", bid.id));
                }
                _ => {}
            }
            prev = Some(bid);
            cursor = bid.next;
        }

        if seen != live_count {
            return invalid(format!("{} bids linked, {} live", seen, live_count));
        }
        let tail = prev.map_or(NULL_BID, |bid| bid.id);
        if tail != snapshot.tail {
            return invalid(format!("tail is {}, walk ended at {}", snapshot.tail, tail));
        }

        info!(bids = live_count, issued = snapshot.records.len(), "order book restored");
        Ok(OrderBook::from_parts(
            arena,
            BookPointers {
                head: snapshot.head,
                tail: snapshot.tail,
            },
            live_count,
            snapshot.max_bid_amount,
        ))
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(bytes);
    u32::from_le_bytes(raw)
}

fn read_u128(bytes: &[u8]) -> u128 {
    let mut raw = [0u8; 16];
    raw.copy_from_slice(bytes);
    u128::from_le_bytes(raw)
}
