//! Masks: side-effect free position predicates that gate edit writes.

use std::collections::HashSet;

use crate::block::id;
use crate::core::types::IVec3;
use crate::region::Region;
use crate::world::World;

#[derive(Clone, Debug)]
pub enum Mask {
    /// Current block id is in the set
    BlockIds(HashSet<u16>),
    /// Current block is not air
    ExistingBlock,
    /// Position lies inside the region
    Region(Region),
    And(Vec<Mask>),
    Or(Vec<Mask>),
    Not(Box<Mask>),
}

impl Mask {
    pub fn block_ids(ids: impl IntoIterator<Item = u16>) -> Self {
        Mask::BlockIds(ids.into_iter().collect())
    }

    /// Negation (builder pattern)
    pub fn inverted(self) -> Self {
        Mask::Not(Box::new(self))
    }

    /// Evaluate against current world state. `And` stops at the first false
    /// and `Or` at the first true.
    pub fn test(&self, world: &dyn World, pos: IVec3) -> bool {
        match self {
            Mask::BlockIds(ids) => ids.contains(&world.block(pos).id),
            Mask::ExistingBlock => world.block(pos).id != id::AIR,
            Mask::Region(region) => region.contains(pos),
            Mask::And(masks) => masks.iter().all(|m| m.test(world, pos)),
            Mask::Or(masks) => masks.iter().any(|m| m.test(world, pos)),
            Mask::Not(mask) => !mask.test(world, pos),
        }
    }
}
