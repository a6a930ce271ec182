//! Change recording for undo/redo.

use std::collections::HashMap;

use crate::block::BaseBlock;
use crate::core::types::IVec3;
use crate::math::Aabb;

/// Net change at one position: the block before the session first touched
/// it and the block it holds now.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeRecord {
    pub pos: IVec3,
    pub before: BaseBlock,
    pub after: BaseBlock,
}

/// Ordered change records, one per distinct position.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    records: Vec<ChangeRecord>,
    /// Position -> index into `records`
    index: HashMap<IVec3, usize>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write. The first write to a position keeps its `before`;
    /// later writes only replace `after`. Returns true for a new position.
    pub fn record(&mut self, pos: IVec3, before: BaseBlock, after: BaseBlock) -> bool {
        if let Some(&i) = self.index.get(&pos) {
            self.records[i].after = after;
            return false;
        }
        self.index.insert(pos, self.records.len());
        self.records.push(ChangeRecord { pos, before, after });
        true
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        self.index.contains_key(&pos)
    }

    pub fn get(&self, pos: IVec3) -> Option<&ChangeRecord> {
        self.index.get(&pos).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order positions were first written
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChangeRecord> {
        self.records.iter()
    }

    /// Box enclosing every changed position
    pub fn bounds(&self) -> Option<Aabb> {
        let first = self.records.first()?;
        let mut bounds = Aabb::point(first.pos);
        for record in &self.records[1..] {
            bounds.include(record.pos);
        }
        Some(bounds)
    }
}
