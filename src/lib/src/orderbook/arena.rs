/// Bid arena
///
/// Fixed-capacity slot vector indexed by `BidId`. Slots are bump-allocated
/// and never reused, so an id stays valid (as removed) after `remove`.

use super::types::{Bid, BidId};

#[derive(Debug, Clone, Copy)]
struct Slot {
    bid: Bid,
    live: bool,
}

/// Capacity-bounded bid storage
pub struct BidArena {
    slots: Vec<Slot>,
    capacity: usize,
}

impl BidArena {
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    /// Id the next `allocate` will hand out
    #[inline]
    pub fn next_id(&self) -> BidId {
        self.slots.len() as BidId
    }

    /// Store a bid under the next id; `None` when full
    #[inline]
    pub fn allocate(&mut self, max_price: u128, amount: u128) -> Option<BidId> {
        if self.slots.len() >= self.capacity {
            return None;
        }
        let id = self.next_id();
        self.slots.push(Slot {
            bid: Bid::new(id, max_price, amount),
            live: true,
        });
        Some(id)
    }

    /// Re-insert a slot verbatim while restoring persisted state
    pub(crate) fn push_raw(&mut self, bid: Bid, live: bool) -> Option<BidId> {
        if self.slots.len() >= self.capacity || bid.id != self.next_id() {
            return None;
        }
        self.slots.push(Slot { bid, live });
        Some(bid.id)
    }

    /// Live bid by id
    #[inline]
    pub fn get(&self, id: BidId) -> Option<&Bid> {
        self.slots
            .get(id as usize)
            .filter(|slot| slot.live)
            .map(|slot| &slot.bid)
    }

    #[inline]
    pub fn get_mut(&mut self, id: BidId) -> Option<&mut Bid> {
        self.slots
            .get_mut(id as usize)
            .filter(|slot| slot.live)
            .map(|slot| &mut slot.bid)
    }

    /// Mark a live bid as removed; returns the bid as it was
    #[inline]
    pub fn retire(&mut self, id: BidId) -> Option<Bid> {
        let slot = self.slots.get_mut(id as usize).filter(|slot| slot.live)?;
        slot.live = false;
        Some(slot.bid)
    }

    /// Every slot in id order, with its live flag
    pub fn slots(&self) -> impl Iterator<Item = (&Bid, bool)> {
        self.slots.iter().map(|slot| (&slot.bid, slot.live))
    }

    /// Ids issued so far, live or not
    #[inline]
    pub fn issued(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.slots.len()
    }
}
