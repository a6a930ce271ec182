//! Hash-map backed world.

use std::collections::{BTreeMap, HashMap};

use crate::block::BaseBlock;
use crate::core::types::{IVec2, IVec3};
use crate::region::Region;
use super::{BiomeId, EntityId, EntitySnapshot, World};

/// Terrain source used by [`World::regenerated_block`].
pub type Generator = fn(IVec3) -> BaseBlock;

/// In-memory world: absent positions are air.
pub struct MemoryWorld {
    blocks: HashMap<IVec3, BaseBlock>,
    biomes: HashMap<IVec2, BiomeId>,
    entities: BTreeMap<EntityId, EntitySnapshot>,
    next_entity: u64,
    max_y: i32,
    generator: Option<Generator>,
    /// Writes that requested a recalculation pass
    notifications: usize,
}

impl MemoryWorld {
    /// Create an empty world with the given height limit.
    pub fn new(max_y: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            biomes: HashMap::new(),
            entities: BTreeMap::new(),
            next_entity: 1,
            max_y,
            generator: None,
            notifications: 0,
        }
    }

    /// Attach a terrain generator for regeneration (builder pattern)
    pub fn with_generator(mut self, generator: Generator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Fill an inclusive box directly, bypassing edit sessions.
    pub fn fill(&mut self, min: IVec3, max: IVec3, block: &BaseBlock) {
        for pos in crate::math::Aabb::new(min, max).iter() {
            self.set_block(pos, block, false);
        }
    }

    /// Number of non-air blocks stored
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of writes that asked for recalculation
    pub fn notifications(&self) -> usize {
        self.notifications
    }

    pub fn entity(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.get(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new(255)
    }
}

impl World for MemoryWorld {
    fn block(&self, pos: IVec3) -> BaseBlock {
        self.blocks.get(&pos).cloned().unwrap_or_default()
    }

    fn set_block(&mut self, pos: IVec3, block: &BaseBlock, notify: bool) -> bool {
        if pos.y < 0 || pos.y > self.max_y {
            return false;
        }
        if notify {
            self.notifications += 1;
        }
        let previous = if block.is_air() {
            self.blocks.remove(&pos)
        } else {
            self.blocks.insert(pos, block.clone())
        };
        previous.unwrap_or_default() != *block
    }

    fn biome(&self, column: IVec2) -> BiomeId {
        self.biomes.get(&column).copied().unwrap_or_default()
    }

    fn set_biome(&mut self, column: IVec2, biome: BiomeId) {
        self.biomes.insert(column, biome);
    }

    fn max_y(&self) -> i32 {
        self.max_y
    }

    fn entities_in(&self, region: &Region) -> Vec<(EntityId, EntitySnapshot)> {
        self.entities
            .iter()
            .filter(|(_, e)| region.contains(e.block_position()))
            .map(|(id, e)| (*id, e.clone()))
            .collect()
    }

    fn remove_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    fn spawn_entity(&mut self, entity: EntitySnapshot) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(id, entity);
        id
    }

    fn regenerated_block(&self, pos: IVec3) -> Option<BaseBlock> {
        self.generator.map(|g| g(pos))
    }
}
