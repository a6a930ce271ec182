//! Block values

pub mod id;
pub mod bag;

use serde::{Deserialize, Serialize};

pub use bag::{BlockBag, MemoryBlockBag};

/// A stack of items held in a container block.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    pub id: u16,
    pub damage: u16,
    pub amount: u8,
}

/// Extended per-block state carried alongside id and data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockPayload {
    /// Sign text, one string per line
    Sign { lines: Vec<String> },
    /// Chest/furnace/dispenser contents, indexed by slot
    Container { items: Vec<Option<ItemStack>> },
    /// Mob spawner creature type
    Spawner { mob: String, delay: i16 },
    /// Note block pitch
    Note { pitch: u8 },
}

/// Block type, data value and optional payload. Equality is structural.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseBlock {
    /// Block type id
    pub id: u16,
    /// Sub-type/data value (orientation, color, ...)
    pub data: u8,
    /// Sign text, inventory contents and the like
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<BlockPayload>,
}

impl BaseBlock {
    /// Air block
    pub const AIR: BaseBlock = BaseBlock {
        id: id::AIR,
        data: 0,
        payload: None,
    };

    /// Block with data value 0
    pub const fn new(id: u16) -> Self {
        Self { id, data: 0, payload: None }
    }

    /// Block with explicit data value
    pub const fn with_data(id: u16, data: u8) -> Self {
        Self { id, data, payload: None }
    }

    /// Attach a payload (builder pattern)
    pub fn with_payload(mut self, payload: BlockPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Check if block is air
    pub fn is_air(&self) -> bool {
        self.id == id::AIR
    }

    /// Same type and data, ignoring payload
    pub fn same_kind(&self, other: &BaseBlock) -> bool {
        self.id == other.id && self.data == other.data
    }
}

/// Block matcher used by replace operations: a type id with an optional data value.
///
/// `data: None` matches every data value of the type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockFilter {
    pub id: u16,
    pub data: Option<u8>,
}

impl BlockFilter {
    /// Match any data value of this type
    pub const fn any_data(id: u16) -> Self {
        Self { id, data: None }
    }

    /// Match exactly this type and data
    pub const fn exact(id: u16, data: u8) -> Self {
        Self { id, data: Some(data) }
    }

    pub fn matches(&self, block: &BaseBlock) -> bool {
        self.id == block.id && self.data.is_none_or(|d| d == block.data)
    }
}

impl From<&BaseBlock> for BlockFilter {
    fn from(block: &BaseBlock) -> Self {
        Self::exact(block.id, block.data)
    }
}
