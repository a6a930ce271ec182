//! Block bags: inventories that supply placed blocks and take back removed ones.

use std::collections::HashMap;

use super::BaseBlock;

/// Material source consulted by an edit session before each placement.
pub trait BlockBag {
    /// Take one of `block` out of the bag. Returns false if none is available.
    fn try_debit(&mut self, block: &BaseBlock) -> bool;

    /// Put one of `block` back into the bag.
    fn refund(&mut self, block: &BaseBlock);

    /// Reconcile pending changes with the backing store at command end.
    fn flush(&mut self) {}
}

/// In-memory bag keyed by block id. Ids not present are unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlockBag {
    counts: HashMap<u16, u32>,
    flushes: u32,
}

impl MemoryBlockBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` of a block id (builder pattern)
    pub fn with(mut self, id: u16, amount: u32) -> Self {
        *self.counts.entry(id).or_insert(0) += amount;
        self
    }

    /// Current stock of a block id
    pub fn count(&self, id: u16) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Number of times `flush` was called
    pub fn flush_count(&self) -> u32 {
        self.flushes
    }
}

impl BlockBag for MemoryBlockBag {
    fn try_debit(&mut self, block: &BaseBlock) -> bool {
        match self.counts.get_mut(&block.id) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }

    fn refund(&mut self, block: &BaseBlock) {
        *self.counts.entry(block.id).or_insert(0) += 1;
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
