//! Host world access.
//!
//! The editing core never owns block storage. It reads and writes through
//! the [`World`] trait, which the host implements over its chunk store.
//! [`MemoryWorld`] is a hash-map backed implementation for tests and tools.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::block::BaseBlock;
use crate::core::types::{DVec3, IVec2, IVec3};
use crate::region::Region;

pub use memory::MemoryWorld;

/// Biome identifier, stored per 2D column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BiomeId(pub u8);

impl BiomeId {
    pub const OCEAN: Self = Self(0);
    pub const PLAINS: Self = Self(1);
    pub const DESERT: Self = Self(2);
    pub const MOUNTAINS: Self = Self(3);
    pub const FOREST: Self = Self(4);
    pub const TAIGA: Self = Self(5);
    pub const SWAMP: Self = Self(6);
    pub const RIVER: Self = Self(7);
    pub const TUNDRA: Self = Self(12);
}

/// Host-assigned entity handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Detached copy of an entity: type, position and opaque host payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub kind: String,
    pub position: DVec3,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl EntitySnapshot {
    pub fn new(kind: impl Into<String>, position: DVec3) -> Self {
        Self {
            kind: kind.into(),
            position,
            payload: serde_json::Value::Null,
        }
    }

    /// Block the entity stands in
    pub fn block_position(&self) -> IVec3 {
        self.position.floor().as_ivec3()
    }
}

/// Read/write access to the host's block storage.
pub trait World {
    /// Block at a position. Unloaded or out-of-range positions read as air.
    fn block(&self, pos: IVec3) -> BaseBlock;

    /// Store a block. `notify` asks the host to run its per-write recalculation
    /// (lighting, physics). Returns true if the stored value changed.
    fn set_block(&mut self, pos: IVec3, block: &BaseBlock, notify: bool) -> bool;

    fn biome(&self, column: IVec2) -> BiomeId;

    fn set_biome(&mut self, column: IVec2, biome: BiomeId);

    /// Highest valid y coordinate. The lowest is 0.
    fn max_y(&self) -> i32;

    /// Entities whose block position lies inside the region.
    fn entities_in(&self, region: &Region) -> Vec<(EntityId, EntitySnapshot)>;

    fn remove_entity(&mut self, id: EntityId) -> bool;

    fn spawn_entity(&mut self, entity: EntitySnapshot) -> EntityId;

    /// Block the world generator would produce at `pos`, if the host can
    /// regenerate terrain.
    fn regenerated_block(&self, _pos: IVec3) -> Option<BaseBlock> {
        None
    }
}
