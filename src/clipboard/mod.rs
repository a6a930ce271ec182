//! Clipboard: a dense snapshot of a box of blocks plus captured entities.
//!
//! Blocks are stored in a flat array in region iteration order: z fastest,
//! then y, then x.
//! `origin` is the world position the snapshot was taken from and `offset`
//! is the snapshot's min corner relative to the placement position at copy
//! time, so a paste at another position keeps the same relative layout.

use log::debug;

use crate::block::{BaseBlock, BlockFilter};
use crate::core::error::Error;
use crate::core::types::{DVec3, IVec3, Result};
use crate::edit::EditSession;
use crate::math::Aabb;
use crate::pattern::Pattern;
use crate::region::Region;
use crate::world::{EntityId, EntitySnapshot, World};

/// Mirror axis for [`Clipboard::flip`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipDirection {
    /// Mirror along z
    NorthSouth,
    /// Mirror along x
    WestEast,
    /// Mirror along y
    UpDown,
}

/// Entity stored with its position relative to the clipboard's min corner
#[derive(Clone, Debug, PartialEq)]
pub struct ClipboardEntity {
    pub offset: DVec3,
    pub snapshot: EntitySnapshot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Clipboard {
    size: IVec3,
    origin: IVec3,
    offset: IVec3,
    blocks: Vec<BaseBlock>,
    entities: Vec<ClipboardEntity>,
}

impl Clipboard {
    /// Empty (all air) clipboard. Each size component is at least 1.
    pub fn new(size: IVec3, origin: IVec3, offset: IVec3) -> Self {
        let size = size.max(IVec3::ONE);
        let volume = (size.x as usize) * (size.y as usize) * (size.z as usize);
        Self {
            size,
            origin,
            offset,
            blocks: vec![BaseBlock::AIR; volume],
            entities: Vec::new(),
        }
    }

    /// Snapshot the region's bounding box as seen through the session.
    pub fn copy(session: &EditSession<'_>, region: &Region, placement: IVec3) -> Self {
        let bounds = region.bounds();
        let mut clipboard = Self::new(bounds.size(), bounds.min, bounds.min - placement);
        for pos in bounds.iter() {
            let block = session.block(pos);
            if !block.is_air() {
                let index = clipboard.index(pos - bounds.min);
                clipboard.blocks[index] = block;
            }
        }
        debug!("copy: {} blocks", clipboard.blocks.len());
        clipboard
    }

    /// Capture the entities standing inside the region. Returns how many
    /// were added.
    pub fn copy_entities(&mut self, world: &dyn World, region: &Region) -> usize {
        self.capture_entities(world, region).len()
    }

    fn capture_entities(&mut self, world: &dyn World, region: &Region) -> Vec<EntityId> {
        let min = self.origin.as_dvec3();
        let found = world.entities_in(region);
        let mut ids = Vec::with_capacity(found.len());
        for (id, snapshot) in found {
            self.entities.push(ClipboardEntity {
                offset: snapshot.position - min,
                snapshot,
            });
            ids.push(id);
        }
        ids
    }

    /// Copy the region, then fill it with `leave` and remove the captured
    /// entities when `with_entities` is set.
    pub fn cut(
        session: &mut EditSession<'_>,
        region: &Region,
        placement: IVec3,
        leave: &Pattern,
        with_entities: bool,
    ) -> Result<Self> {
        let mut clipboard = Self::copy(session, region, placement);
        if with_entities {
            for id in clipboard.capture_entities(session.world(), region) {
                session.world_mut().remove_entity(id);
            }
        }
        session.set_blocks(region, leave)?;
        Ok(clipboard)
    }

    /// Paste relative to a placement position, keeping the copy-time layout.
    pub fn paste(&self, session: &mut EditSession<'_>, pos: IVec3, skip_air: bool, with_entities: bool) -> Result<usize> {
        self.place(session, pos + self.offset, skip_air, with_entities)
    }

    /// Paste back where the snapshot was taken.
    pub fn paste_at_origin(&self, session: &mut EditSession<'_>, skip_air: bool, with_entities: bool) -> Result<usize> {
        self.place(session, self.origin, skip_air, with_entities)
    }

    /// Paste with the snapshot's min corner at `min`.
    ///
    /// Air cells are skipped when `skip_air` is set so the destination's
    /// blocks survive under them.
    pub fn place(&self, session: &mut EditSession<'_>, min: IVec3, skip_air: bool, with_entities: bool) -> Result<usize> {
        session.begin();
        for local in self.local_box().iter() {
            let block = &self.blocks[self.index(local)];
            if skip_air && block.is_air() {
                continue;
            }
            session.put(min + local, block)?;
        }
        if with_entities {
            for entity in &self.entities {
                let mut snapshot = entity.snapshot.clone();
                snapshot.position = min.as_dvec3() + entity.offset;
                session.world_mut().spawn_entity(snapshot);
            }
        }
        session.finish("paste")
    }

    /// Rotate around the y axis by a multiple of 90 degrees. Positive angles
    /// turn x toward z. The offset turns with the content, so pastes stay
    /// anchored on the placement position.
    pub fn rotate_2d(&mut self, angle: i32) -> Result<()> {
        if angle % 90 != 0 {
            return Err(Error::InvalidInput(format!(
                "Rotation angle must be a multiple of 90, got {}",
                angle
            )));
        }
        for _ in 0..(angle / 90).rem_euclid(4) {
            self.quarter_turn();
        }
        Ok(())
    }

    /// (x, z) -> (size.z - 1 - z, x)
    fn quarter_turn(&mut self) {
        let old_box = self.local_box();
        let old_size = self.size;
        let old_blocks = std::mem::take(&mut self.blocks);
        self.size = IVec3::new(old_size.z, old_size.y, old_size.x);
        self.blocks = vec![BaseBlock::AIR; old_blocks.len()];
        for (block, local) in old_blocks.into_iter().zip(old_box.iter()) {
            let turned = IVec3::new(old_size.z - 1 - local.z, local.y, local.x);
            let index = self.index(turned);
            self.blocks[index] = block;
        }
        let o = self.offset;
        self.offset = IVec3::new(-o.z - (old_size.z - 1), o.y, o.x);
        let depth = old_size.z as f64;
        for entity in &mut self.entities {
            let o = entity.offset;
            entity.offset = DVec3::new(depth - o.z, o.y, o.x);
        }
    }

    /// Mirror the content along one axis. With `around_anchor` the offset is
    /// mirrored too, so a paste lands on the other side of the placement
    /// position.
    pub fn flip(&mut self, direction: FlipDirection, around_anchor: bool) {
        let axis = match direction {
            FlipDirection::WestEast => 0,
            FlipDirection::UpDown => 1,
            FlipDirection::NorthSouth => 2,
        };
        let extent = self.size[axis];
        for local in self.local_box().iter() {
            let mut mirror = local;
            mirror[axis] = extent - 1 - local[axis];
            if local[axis] < mirror[axis] {
                let (a, b) = (self.index(local), self.index(mirror));
                self.blocks.swap(a, b);
            }
        }
        for entity in &mut self.entities {
            let mirrored = extent as f64 - entity.offset[axis];
            entity.offset[axis] = mirrored;
        }
        if around_anchor {
            let mirrored = 1 - self.offset[axis] - extent;
            self.offset[axis] = mirrored;
        }
    }

    /// Count stored blocks by type, most common first.
    pub fn block_distribution(&self, separate_data: bool) -> Vec<(BlockFilter, usize)> {
        crate::edit::block_distribution(&self.blocks, separate_data)
    }

    pub fn size(&self) -> IVec3 {
        self.size
    }

    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn offset(&self) -> IVec3 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: IVec3) {
        self.offset = offset;
    }

    pub fn entities(&self) -> &[ClipboardEntity] {
        &self.entities
    }

    /// Block at a local position, `None` outside the snapshot
    pub fn block_at(&self, local: IVec3) -> Option<&BaseBlock> {
        self.in_bounds(local).then(|| &self.blocks[self.index(local)])
    }

    /// Store a block at a local position. Returns false outside the snapshot.
    pub fn set_block_at(&mut self, local: IVec3, block: BaseBlock) -> bool {
        if !self.in_bounds(local) {
            return false;
        }
        let index = self.index(local);
        self.blocks[index] = block;
        true
    }

    fn local_box(&self) -> Aabb {
        Aabb::new(IVec3::ZERO, self.size - IVec3::ONE)
    }

    fn in_bounds(&self, local: IVec3) -> bool {
        local.cmpge(IVec3::ZERO).all() && local.cmplt(self.size).all()
    }

    fn index(&self, local: IVec3) -> usize {
        ((local.x * self.size.y + local.y) * self.size.z + local.z) as usize
    }
}
