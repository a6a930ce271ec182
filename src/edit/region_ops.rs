//! Region-wide operations: fills, replacements, walls, move/stack, hollow
//! and read-only analysis.

use std::collections::{HashSet, VecDeque};

use crate::block::{id, BaseBlock, BlockFilter};
use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::pattern::Pattern;
use crate::region::Region;

use super::session::EditSession;

pub(crate) const NEIGHBORS: [IVec3; 6] = [
    IVec3::X,
    IVec3::NEG_X,
    IVec3::Y,
    IVec3::NEG_Y,
    IVec3::Z,
    IVec3::NEG_Z,
];

impl<'a> EditSession<'a> {
    /// Fill every position of the region from the pattern.
    pub fn set_blocks(&mut self, region: &Region, pattern: &Pattern) -> Result<usize> {
        self.begin();
        match pattern.as_single() {
            Some(block) => {
                for pos in region.iter() {
                    self.put(pos, block)?;
                }
            }
            None => {
                for pos in region.iter() {
                    self.put(pos, &pattern.next(pos))?;
                }
            }
        }
        self.finish("set")
    }

    /// Replace blocks matching `from` (every non-air block when `None`).
    pub fn replace_blocks(
        &mut self,
        region: &Region,
        from: Option<&[BlockFilter]>,
        pattern: &Pattern,
    ) -> Result<usize> {
        self.begin();
        for pos in region.iter() {
            let current = self.block(pos);
            let hit = match from {
                Some(filters) => filters.iter().any(|f| f.matches(&current)),
                None => !current.is_air(),
            };
            if hit {
                self.put(pos, &pattern.next(pos))?;
            }
        }
        self.finish("replace")
    }

    /// Place one layer on top of the highest non-air block of every column.
    pub fn overlay_cuboid_blocks(&mut self, region: &Region, pattern: &Pattern) -> Result<usize> {
        self.begin();
        let (min_y, max_y) = (region.min().y, region.max().y);
        let world_top = self.max_y();
        for column in region.columns() {
            for y in (min_y..=max_y).rev() {
                let pos = IVec3::new(column.x, y, column.y);
                let above = pos + IVec3::Y;
                if y + 1 <= world_top && !self.block(pos).is_air() && self.block(above).is_air() {
                    self.put(above, &pattern.next(above))?;
                    break;
                }
            }
        }
        self.finish("overlay")
    }

    /// The four vertical sides of the bounding box.
    pub fn make_cuboid_walls(&mut self, region: &Region, pattern: &Pattern) -> Result<usize> {
        self.begin();
        let bounds = region.bounds();
        let (min, max) = (bounds.min, bounds.max);
        for pos in bounds.iter() {
            if pos.x == min.x || pos.x == max.x || pos.z == min.z || pos.z == max.z {
                self.put(pos, &pattern.next(pos))?;
            }
        }
        self.finish("walls")
    }

    /// All six faces of the bounding box.
    pub fn make_cuboid_faces(&mut self, region: &Region, pattern: &Pattern) -> Result<usize> {
        self.begin();
        let bounds = region.bounds();
        let (min, max) = (bounds.min, bounds.max);
        for pos in bounds.iter() {
            if pos.cmpeq(min).any() || pos.cmpeq(max).any() {
                self.put(pos, &pattern.next(pos))?;
            }
        }
        self.finish("faces")
    }

    /// Fill the center block of the region: one block per axis with an odd
    /// length, two with an even one.
    pub fn center(&mut self, region: &Region, pattern: &Pattern) -> Result<usize> {
        let center = region.bounds().center();
        let core = Region::cuboid(center.floor().as_ivec3(), center.ceil().as_ivec3());
        self.set_blocks(&core, pattern)
    }

    /// Re-layer terrain columns: the top grass/dirt/stone block becomes
    /// grass, the next three dirt and everything below stone. Any other block
    /// ends the layer, and the next transformable block starts a new top.
    pub fn naturalize_cuboid_blocks(&mut self, region: &Region) -> Result<usize> {
        self.begin();
        let grass = BaseBlock::new(id::GRASS);
        let dirt = BaseBlock::new(id::DIRT);
        let stone = BaseBlock::new(id::STONE);
        let (min_y, max_y) = (region.min().y, region.max().y);

        for column in region.columns() {
            let mut depth: Option<u32> = None;
            for y in (min_y..=max_y).rev() {
                let pos = IVec3::new(column.x, y, column.y);
                if !region.contains(pos) {
                    continue;
                }
                let current = self.block(pos).id;
                if !matches!(current, id::GRASS | id::DIRT | id::STONE) {
                    depth = None;
                    continue;
                }
                let level = depth.map_or(0, |d| d + 1);
                depth = Some(level);
                let target = match level {
                    0 => &grass,
                    1..=3 => &dirt,
                    _ => &stone,
                };
                self.put_if_changed(pos, target)?;
            }
        }
        self.finish("naturalize")
    }

    /// Move the region's contents by `dir * distance`, leaving `replacement`
    /// (air when `None`) behind. Without `copy_air`, air cells are not moved.
    pub fn move_cuboid_region(
        &mut self,
        region: &Region,
        dir: IVec3,
        distance: i32,
        copy_air: bool,
        replacement: Option<BaseBlock>,
    ) -> Result<usize> {
        self.begin();
        let shift = dir * distance;
        let replacement = replacement.unwrap_or(BaseBlock::AIR);

        let mut moved = Vec::new();
        for pos in region.iter() {
            let block = self.block(pos);
            if copy_air || !block.is_air() {
                moved.push((pos, block));
            }
        }
        let targets: HashSet<IVec3> = moved.iter().map(|(pos, _)| *pos + shift).collect();

        // Sources that end up overwritten are not cleared first
        for (pos, _) in &moved {
            if !targets.contains(pos) {
                self.put(*pos, &replacement)?;
            }
        }
        for (pos, block) in &moved {
            self.put(*pos + shift, block)?;
        }
        self.finish("move")
    }

    /// Repeat the region's contents `count` times along `dir`.
    pub fn stack_cuboid_region(
        &mut self,
        region: &Region,
        dir: IVec3,
        count: u32,
        copy_air: bool,
    ) -> Result<usize> {
        let count = i32::try_from(count)
            .map_err(|_| Error::InvalidInput(format!("stack count {} is too large", count)))?;
        self.begin();
        let span = region.max() - region.min();
        let step = dir * (dir.dot(span).abs() + 1);

        let mut sources = Vec::new();
        for pos in region.iter() {
            let block = self.block(pos);
            if copy_air || !block.is_air() {
                sources.push((pos, block));
            }
        }
        for (pos, block) in &sources {
            for i in 1..=count {
                self.put(pos.saturating_add(step.saturating_mul(IVec3::splat(i))), block)?;
            }
        }
        self.finish("stack")
    }

    /// Hollow the region out: keep a shell `thickness` blocks deep and fill
    /// everything inside it from the pattern.
    ///
    /// The outside is everything around the region plus the passable blocks
    /// connected to it. Shell layers grow inward from the outside by face
    /// adjacency.
    pub fn hollow_out_region(
        &mut self,
        region: &Region,
        thickness: u32,
        pattern: &Pattern,
    ) -> Result<usize> {
        self.begin();
        let area = region.bounds().padded(1);

        let mut outside: HashSet<IVec3> = HashSet::new();
        let mut queue: VecDeque<IVec3> = VecDeque::new();
        for pos in area.iter() {
            if !region.contains(pos) {
                outside.insert(pos);
                queue.push_back(pos);
            }
        }
        while let Some(pos) = queue.pop_front() {
            for offset in NEIGHBORS {
                let next = pos + offset;
                if region.contains(next)
                    && !outside.contains(&next)
                    && id::can_pass_through(self.block(next).id)
                {
                    outside.insert(next);
                    queue.push_back(next);
                }
            }
        }

        let mut shell = outside;
        for _ in 0..thickness {
            let layer: Vec<IVec3> = region
                .iter()
                .filter(|p| !shell.contains(p))
                .filter(|p| NEIGHBORS.iter().any(|o| shell.contains(&(*p + *o))))
                .collect();
            if layer.is_empty() {
                break;
            }
            shell.extend(layer);
        }

        let interior: Vec<IVec3> = region.iter().filter(|p| !shell.contains(p)).collect();
        for pos in interior {
            self.put(pos, &pattern.next(pos))?;
        }
        self.finish("hollow")
    }

    /// Number of positions whose block matches any filter.
    pub fn count_blocks(&self, region: &Region, filters: &[BlockFilter]) -> usize {
        region
            .iter()
            .filter(|p| {
                let block = self.block(*p);
                filters.iter().any(|f| f.matches(&block))
            })
            .count()
    }

    /// Block counts inside the region, most common first.
    pub fn block_distribution(&self, region: &Region, separate_data: bool) -> Vec<(BlockFilter, usize)> {
        let blocks: Vec<BaseBlock> = region.iter().map(|p| self.block(p)).collect();
        super::block_distribution(&blocks, separate_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemoryBlockBag;
    use crate::mask::Mask;
    use crate::world::{MemoryWorld, World};

    fn stone() -> Pattern {
        Pattern::Single(BaseBlock::new(id::STONE))
    }

    fn cube() -> Region {
        Region::cuboid(IVec3::ZERO, IVec3::splat(2))
    }

    #[test]
    fn test_set_then_count() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let affected = session.set_blocks(&cube(), &stone()).unwrap();
        assert_eq!(affected, 27);
        assert_eq!(session.count_blocks(&cube(), &[BlockFilter::any_data(id::STONE)]), 27);
        assert_eq!(session.change_count(), 27);
    }

    #[test]
    fn test_set_counts_area_for_every_shape() {
        let sphere = Region::Ellipsoid(crate::region::EllipsoidRegion::sphere(IVec3::splat(10), 3.0));
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let affected = session.set_blocks(&sphere, &stone()).unwrap();
        assert_eq!(affected, sphere.area());
        assert_eq!(session.count_blocks(&sphere, &[BlockFilter::any_data(id::STONE)]), sphere.area());
    }

    #[test]
    fn test_budget_aborts_with_partial_changes() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world).with_change_limit(Some(10));
        let err = session.set_blocks(&cube(), &stone()).unwrap_err();
        assert!(matches!(err, Error::ChangeBudgetExceeded { limit: 10, affected: 10 }));
        assert_eq!(session.change_count(), 10);
        drop(session);
        assert_eq!(world.block_count(), 10);
    }

    #[test]
    fn test_mask_limits_affected() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::new(2, 0, 2), &BaseBlock::new(id::DIRT));
        let mut session = EditSession::new(&mut world).with_mask(Some(Mask::ExistingBlock));
        assert_eq!(session.set_blocks(&cube(), &stone()).unwrap(), 9);
    }

    #[test]
    fn test_replace_with_filter_and_default() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::new(2, 0, 2), &BaseBlock::new(id::DIRT));
        world.set_block(IVec3::new(0, 1, 0), &BaseBlock::new(id::SAND), false);
        let mut session = EditSession::new(&mut world);

        let from = [BlockFilter::any_data(id::SAND)];
        assert_eq!(session.replace_blocks(&cube(), Some(&from), &stone()).unwrap(), 1);
        // Every non-air block
        let glass = Pattern::Single(BaseBlock::new(id::GLASS));
        assert_eq!(session.replace_blocks(&cube(), None, &glass).unwrap(), 10);
    }

    #[test]
    fn test_overlay() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::new(2, 0, 2), &BaseBlock::new(id::DIRT));
        world.set_block(IVec3::new(1, 1, 1), &BaseBlock::new(id::DIRT), false);
        let mut session = EditSession::new(&mut world);

        let region = Region::cuboid(IVec3::ZERO, IVec3::new(2, 5, 2));
        let snow = Pattern::Single(BaseBlock::new(id::SNOW));
        assert_eq!(session.overlay_cuboid_blocks(&region, &snow).unwrap(), 9);
        assert_eq!(session.block(IVec3::new(1, 2, 1)).id, id::SNOW);
        assert_eq!(session.block(IVec3::new(0, 1, 0)).id, id::SNOW);
    }

    #[test]
    fn test_walls_and_faces() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::splat(4));
        // 5x5 ring of 16, 5 high
        assert_eq!(session.make_cuboid_walls(&region, &stone()).unwrap(), 80);
        // 125 - 3x3x3 interior
        assert_eq!(session.make_cuboid_faces(&region, &stone()).unwrap(), 98);
    }

    #[test]
    fn test_center() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        assert_eq!(session.center(&Region::cuboid(IVec3::ZERO, IVec3::new(2, 3, 4)), &stone()).unwrap(), 2);
        assert_eq!(session.block(IVec3::new(1, 1, 2)).id, id::STONE);
        assert_eq!(session.block(IVec3::new(1, 2, 2)).id, id::STONE);
    }

    #[test]
    fn test_naturalize() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::new(0, 9, 0), &BaseBlock::new(id::STONE));
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::new(0, 12, 0));

        // Top becomes grass, three dirt, rest stays stone
        assert_eq!(session.naturalize_cuboid_blocks(&region).unwrap(), 4);
        assert_eq!(session.block(IVec3::new(0, 9, 0)).id, id::GRASS);
        assert_eq!(session.block(IVec3::new(0, 6, 0)).id, id::DIRT);
        assert_eq!(session.block(IVec3::new(0, 5, 0)).id, id::STONE);
        // Already natural
        assert_eq!(session.naturalize_cuboid_blocks(&region).unwrap(), 0);
    }

    #[test]
    fn test_move_leaves_replacement() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::new(1, 0, 0), &BaseBlock::new(id::STONE));
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::new(1, 0, 0));

        let affected = session
            .move_cuboid_region(&region, IVec3::X, 1, false, Some(BaseBlock::new(id::GLASS)))
            .unwrap();
        // One cleared source, two destinations
        assert_eq!(affected, 3);
        assert_eq!(session.block(IVec3::new(0, 0, 0)).id, id::GLASS);
        assert_eq!(session.block(IVec3::new(1, 0, 0)).id, id::STONE);
        assert_eq!(session.block(IVec3::new(2, 0, 0)).id, id::STONE);
    }

    #[test]
    fn test_stack() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::new(1, 0, 1), &BaseBlock::new(id::STONE));
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::new(1, 1, 1));

        // Air skipped: 4 blocks x 3 copies
        assert_eq!(session.stack_cuboid_region(&region, IVec3::Y, 3, false).unwrap(), 12);
        assert_eq!(session.block(IVec3::new(0, 2, 0)).id, id::STONE);
        assert!(session.block(IVec3::new(0, 3, 0)).is_air());
        assert_eq!(session.block(IVec3::new(1, 6, 1)).id, id::STONE);
    }

    #[test]
    fn test_stack_count_out_of_range() {
        let mut world = MemoryWorld::new(64);
        world.set_block(IVec3::ZERO, &BaseBlock::new(id::STONE), false);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::ZERO);

        let count = i32::MAX as u32 + 1;
        assert!(matches!(
            session.stack_cuboid_region(&region, IVec3::Y, count, false),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(session.change_count(), 0);
    }

    #[test]
    fn test_hollow_solid_cube() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::splat(4), &BaseBlock::new(id::STONE));
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::splat(4));
        let air = Pattern::Single(BaseBlock::AIR);

        assert_eq!(session.hollow_out_region(&region, 1, &air).unwrap(), 27);
        assert!(session.block(IVec3::splat(2)).is_air());
        assert_eq!(session.block(IVec3::new(0, 2, 2)).id, id::STONE);
    }

    #[test]
    fn test_hollow_thickness_two() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::splat(4), &BaseBlock::new(id::STONE));
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::splat(4));
        let air = Pattern::Single(BaseBlock::AIR);
        assert_eq!(session.hollow_out_region(&region, 2, &air).unwrap(), 1);
    }

    #[test]
    fn test_distribution() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::ZERO, IVec3::new(2, 0, 2), &BaseBlock::new(id::DIRT));
        let session = EditSession::new(&mut world);
        let dist = session.block_distribution(&cube(), false);
        assert_eq!(dist[0], (BlockFilter::any_data(id::AIR), 18));
        assert_eq!(dist[1], (BlockFilter::any_data(id::DIRT), 9));
    }

    #[test]
    fn test_bag_shortage_skips_positions() {
        let mut world = MemoryWorld::new(64);
        let mut bag = MemoryBlockBag::new().with(id::STONE, 5);
        let mut session = EditSession::new(&mut world).with_bag(&mut bag);
        assert_eq!(session.set_blocks(&cube(), &stone()).unwrap(), 5);
        assert_eq!(session.missing_materials().get(&id::STONE), Some(&22));
        assert!(matches!(session.flush_bag(), Err(Error::MaterialUnavailable { .. })));
    }
}
