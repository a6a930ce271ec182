//! Edit session: the single write path for every operation.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::block::{BaseBlock, BlockBag};
use crate::core::config;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::mask::Mask;
use crate::world::World;

use super::change::ChangeSet;

/// A buffered, budgeted unit of block mutation.
///
/// Every write goes through one path that checks the world height, the
/// mask, the change budget and the block bag before touching the world,
/// then records the position's net change. Operations return the number of
/// positions they wrote.
pub struct EditSession<'a> {
    world: &'a mut dyn World,
    bag: Option<&'a mut dyn BlockBag>,
    mask: Option<Mask>,
    /// Max distinct positions recorded over the session's lifetime
    change_limit: Option<usize>,
    fast_mode: bool,
    max_radius: Option<f64>,
    changes: ChangeSet,
    /// Placements the bag could not supply, by block id
    missing: BTreeMap<u16, usize>,
    /// Writes made by the operation in progress
    affected: usize,
}

impl<'a> EditSession<'a> {
    /// Unlimited, unmasked session over a world
    pub fn new(world: &'a mut dyn World) -> Self {
        Self {
            world,
            bag: None,
            mask: None,
            change_limit: None,
            fast_mode: false,
            max_radius: None,
            changes: ChangeSet::new(),
            missing: BTreeMap::new(),
            affected: 0,
        }
    }

    /// Set the change budget (builder pattern)
    pub fn with_change_limit(mut self, limit: Option<usize>) -> Self {
        self.change_limit = limit;
        self
    }

    /// Set the write mask (builder pattern)
    pub fn with_mask(mut self, mask: Option<Mask>) -> Self {
        self.mask = mask;
        self
    }

    /// Attach a block bag (builder pattern)
    pub fn with_bag(mut self, bag: &'a mut dyn BlockBag) -> Self {
        self.bag = Some(bag);
        self
    }

    /// Skip the world's per-write recalculation (builder pattern)
    pub fn with_fast_mode(mut self, fast_mode: bool) -> Self {
        self.fast_mode = fast_mode;
        self
    }

    /// Bound for radius-based operations (builder pattern)
    pub fn with_max_radius(mut self, max_radius: Option<f64>) -> Self {
        self.max_radius = max_radius;
        self
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn set_mask(&mut self, mask: Option<Mask>) {
        self.mask = mask;
    }

    pub fn change_limit(&self) -> Option<usize> {
        self.change_limit
    }

    pub fn set_change_limit(&mut self, limit: Option<usize>) {
        self.change_limit = limit;
    }

    pub fn fast_mode(&self) -> bool {
        self.fast_mode
    }

    pub fn set_fast_mode(&mut self, fast_mode: bool) {
        self.fast_mode = fast_mode;
    }

    pub fn world(&self) -> &dyn World {
        &*self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut dyn World {
        &mut *self.world
    }

    /// Current block at a position
    pub fn block(&self, pos: IVec3) -> BaseBlock {
        self.world.block(pos)
    }

    pub fn max_y(&self) -> i32 {
        self.world.max_y()
    }

    /// Recorded changes so far
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Number of distinct positions changed by this session
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    /// Detach the recorded changes, releasing the world borrow
    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }

    /// Placements skipped because the bag ran out
    pub fn missing_materials(&self) -> &BTreeMap<u16, usize> {
        &self.missing
    }

    /// Write a single block. Returns false if the write was filtered out.
    pub fn set_block(&mut self, pos: IVec3, block: &BaseBlock) -> Result<bool> {
        self.begin();
        self.put(pos, block)
    }

    /// Write a batch of explicit position/block pairs.
    pub fn set_blocks_at<I>(&mut self, blocks: I) -> Result<usize>
    where
        I: IntoIterator<Item = (IVec3, BaseBlock)>,
    {
        self.begin();
        for (pos, block) in blocks {
            self.put(pos, &block)?;
        }
        Ok(self.affected)
    }

    /// End-of-command bag reconciliation. Reports every placement the bag
    /// could not supply since the last flush.
    pub fn flush_bag(&mut self) -> Result<()> {
        if let Some(bag) = self.bag.as_deref_mut() {
            bag.flush();
        }
        if self.missing.is_empty() {
            return Ok(());
        }
        let missing: Vec<(u16, usize)> = std::mem::take(&mut self.missing).into_iter().collect();
        warn!("Block bag could not supply {} block types", missing.len());
        Err(Error::MaterialUnavailable { missing })
    }

    /// Pre-flight bound check for radius-based operations.
    pub fn check_radius(&self, radius: f64) -> Result<()> {
        config::check_radius(self.max_radius, radius)
    }

    /// Start counting a new operation.
    pub(crate) fn begin(&mut self) {
        self.affected = 0;
    }

    /// Log and return the operation's count.
    pub(crate) fn finish(&self, operation: &str) -> Result<usize> {
        debug!("{}: {} blocks affected", operation, self.affected);
        Ok(self.affected)
    }

    /// The write path. Returns Ok(false) for writes skipped by height,
    /// mask or bag, and an error once the change budget is spent.
    pub(crate) fn put(&mut self, pos: IVec3, block: &BaseBlock) -> Result<bool> {
        if pos.y < 0 || pos.y > self.world.max_y() {
            return Ok(false);
        }
        if let Some(mask) = &self.mask {
            if !mask.test(&*self.world, pos) {
                return Ok(false);
            }
        }
        if let Some(limit) = self.change_limit {
            if self.changes.len() >= limit && !self.changes.contains(pos) {
                warn!(
                    "Change limit of {} reached after {} writes in this operation",
                    limit, self.affected
                );
                return Err(Error::ChangeBudgetExceeded {
                    limit,
                    affected: self.affected,
                });
            }
        }

        let current = self.world.block(pos);
        if let Some(bag) = self.bag.as_deref_mut() {
            if !block.is_air() && !bag.try_debit(block) {
                *self.missing.entry(block.id).or_insert(0) += 1;
                return Ok(false);
            }
            if !current.is_air() {
                bag.refund(&current);
            }
        }

        self.world.set_block(pos, block, !self.fast_mode);
        self.changes.record(pos, current, block.clone());
        self.affected += 1;
        Ok(true)
    }

    /// Write only if the value actually differs.
    pub(crate) fn put_if_changed(&mut self, pos: IVec3, block: &BaseBlock) -> Result<bool> {
        if self.world.block(pos) == *block {
            return Ok(false);
        }
        self.put(pos, block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{id, MemoryBlockBag};
    use crate::world::MemoryWorld;

    #[test]
    fn test_records_net_change() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let pos = IVec3::new(1, 1, 1);

        session.set_block(pos, &BaseBlock::new(id::STONE)).unwrap();
        session.set_block(pos, &BaseBlock::new(id::DIRT)).unwrap();

        let changes = session.into_changes();
        assert_eq!(changes.len(), 1);
        let record = changes.get(pos).unwrap();
        assert!(record.before.is_air());
        assert_eq!(record.after.id, id::DIRT);
        assert_eq!(world.block(pos).id, id::DIRT);
    }

    #[test]
    fn test_height_bounds() {
        let mut world = MemoryWorld::new(10);
        let mut session = EditSession::new(&mut world);
        assert!(!session.set_block(IVec3::new(0, 11, 0), &BaseBlock::new(id::STONE)).unwrap());
        assert!(!session.set_block(IVec3::new(0, -1, 0), &BaseBlock::new(id::STONE)).unwrap());
        assert_eq!(session.change_count(), 0);
    }

    #[test]
    fn test_mask_filters() {
        let mut world = MemoryWorld::new(64);
        world.set_block(IVec3::ZERO, &BaseBlock::new(id::DIRT), false);
        let mut session = EditSession::new(&mut world).with_mask(Some(Mask::ExistingBlock));

        assert!(session.set_block(IVec3::ZERO, &BaseBlock::new(id::STONE)).unwrap());
        assert!(!session.set_block(IVec3::X, &BaseBlock::new(id::STONE)).unwrap());
        assert_eq!(session.change_count(), 1);
    }

    #[test]
    fn test_budget_counts_distinct_positions() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world).with_change_limit(Some(2));
        let stone = BaseBlock::new(id::STONE);

        session.set_block(IVec3::new(0, 0, 0), &stone).unwrap();
        session.set_block(IVec3::new(1, 0, 0), &stone).unwrap();
        // Rewriting a recorded position is free
        session.set_block(IVec3::new(1, 0, 0), &BaseBlock::new(id::DIRT)).unwrap();

        let err = session.set_block(IVec3::new(2, 0, 0), &stone).unwrap_err();
        assert!(matches!(err, Error::ChangeBudgetExceeded { limit: 2, affected: 0 }));
        assert_eq!(session.change_count(), 2);
    }

    #[test]
    fn test_fast_mode_suppresses_notify() {
        let mut world = MemoryWorld::new(64);
        {
            let mut session = EditSession::new(&mut world).with_fast_mode(true);
            session.set_block(IVec3::ZERO, &BaseBlock::new(id::STONE)).unwrap();
            assert_eq!(session.change_count(), 1);
        }
        assert_eq!(world.notifications(), 0);

        let mut session = EditSession::new(&mut world);
        session.set_block(IVec3::X, &BaseBlock::new(id::STONE)).unwrap();
        drop(session);
        assert_eq!(world.notifications(), 1);
    }

    #[test]
    fn test_bag_debits_and_refunds() {
        let mut world = MemoryWorld::new(64);
        world.set_block(IVec3::ZERO, &BaseBlock::new(id::DIRT), false);
        let mut bag = MemoryBlockBag::new().with(id::STONE, 1);
        {
            let mut session = EditSession::new(&mut world).with_bag(&mut bag);
            let stone = BaseBlock::new(id::STONE);
            let placed = session
                .set_blocks_at([(IVec3::ZERO, stone.clone()), (IVec3::X, stone.clone())])
                .unwrap();
            assert_eq!(placed, 1);
            assert_eq!(session.missing_materials().get(&id::STONE), Some(&1));

            let err = session.flush_bag().unwrap_err();
            assert_eq!(err.to_string(), "Missing materials: Stone x1");
            assert!(session.flush_bag().is_ok());
        }
        assert_eq!(bag.count(id::STONE), 0);
        assert_eq!(bag.count(id::DIRT), 1);
        assert_eq!(bag.flush_count(), 2);
        assert!(world.block(IVec3::X).is_air());
    }

    #[test]
    fn test_radius_check() {
        let mut world = MemoryWorld::new(64);
        let session = EditSession::new(&mut world).with_max_radius(Some(5.0));
        assert!(session.check_radius(5.0).is_ok());
        assert!(matches!(session.check_radius(6.0), Err(Error::LimitExceeded { .. })));
    }
}
