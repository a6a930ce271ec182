//! Terrain, liquid, biome, regeneration and entity helpers.

use std::collections::HashSet;

use log::debug;

use crate::block::{id, BaseBlock, BlockFilter};
use crate::core::error::Error;
use crate::core::types::{IVec2, IVec3, Result};
use crate::pattern::Pattern;
use crate::region::Region;
use crate::world::BiomeId;

use super::heightmap::{GaussianKernel, HeightMap};
use super::region_ops::NEIGHBORS;
use super::session::EditSession;

const HORIZONTAL: [IVec3; 4] = [IVec3::X, IVec3::NEG_X, IVec3::Z, IVec3::NEG_Z];

fn horizontal_distance(a: IVec3, b: IVec3) -> f64 {
    IVec2::new(a.x - b.x, a.z - b.z).as_dvec2().length()
}

impl<'a> EditSession<'a> {
    /// Fill air around `origin` outward in x/z and down at most `depth`
    /// blocks.
    ///
    /// Non-recursive fills spread column by column at the origin's height and
    /// pour each column down to the first solid block. Recursive fills flood
    /// through any connected air below the origin.
    pub fn fill_xz(
        &mut self,
        origin: IVec3,
        pattern: &Pattern,
        radius: f64,
        depth: i32,
        recursive: bool,
    ) -> Result<usize> {
        self.check_radius(radius)?;
        self.begin();
        let min_y = (origin.y - depth + 1).max(0);
        let mut visited = HashSet::new();
        let mut stack = vec![origin];

        while let Some(pos) = stack.pop() {
            if !visited.insert(pos) {
                continue;
            }
            if recursive {
                if pos.as_dvec3().distance(origin.as_dvec3()) > radius || !self.block(pos).is_air() {
                    continue;
                }
                if !self.put(pos, &pattern.next(pos))? {
                    continue;
                }
                stack.extend(HORIZONTAL.iter().map(|o| pos + *o));
                if pos.y - 1 >= min_y {
                    stack.push(pos - IVec3::Y);
                }
            } else {
                if horizontal_distance(pos, origin) > radius || !self.block(pos).is_air() {
                    continue;
                }
                let mut y = pos.y;
                while y >= min_y {
                    let p = IVec3::new(pos.x, y, pos.z);
                    if !self.block(p).is_air() {
                        break;
                    }
                    self.put(p, &pattern.next(p))?;
                    y -= 1;
                }
                stack.extend(HORIZONTAL.iter().map(|o| pos + *o));
            }
        }
        self.finish("fill")
    }

    /// Remove liquid connected to the blocks around `pos`, within `radius`.
    pub fn drain_area(&mut self, pos: IVec3, radius: f64) -> Result<usize> {
        self.check_radius(radius)?;
        self.begin();
        let mut visited = HashSet::new();
        let mut stack: Vec<IVec3> = crate::math::Aabb::new(pos - IVec3::ONE, pos + IVec3::ONE).iter().collect();

        while let Some(cur) = stack.pop() {
            if !id::is_liquid(self.block(cur).id) || !visited.insert(cur) {
                continue;
            }
            if cur.as_dvec3().distance(pos.as_dvec3()) > radius {
                continue;
            }
            self.put(cur, &BaseBlock::AIR)?;
            stack.extend(NEIGHBORS.iter().map(|o| cur + *o));
        }
        self.finish("drain")
    }

    /// Turn moving liquid connected to `pos` into its stationary form and
    /// fill air gaps in the same layers, within `radius`.
    ///
    /// Seeds are the `moving`/`stationary` blocks in the 3x3x3 around `pos`.
    /// The fill spreads horizontally only.
    pub fn fix_liquid(&mut self, pos: IVec3, radius: f64, moving: u16, stationary: u16) -> Result<usize> {
        self.check_radius(radius)?;
        self.begin();
        let still = BaseBlock::new(stationary);
        let mut visited = HashSet::new();
        let mut stack: Vec<IVec3> = crate::math::Aabb::new(pos - IVec3::ONE, pos + IVec3::ONE)
            .iter()
            .filter(|p| {
                let block_id = self.block(*p).id;
                block_id == moving || block_id == stationary
            })
            .collect();

        while let Some(cur) = stack.pop() {
            let block_id = self.block(cur).id;
            if block_id != moving && block_id != stationary && block_id != id::AIR {
                continue;
            }
            if cur.as_dvec3().distance(pos.as_dvec3()) > radius || !visited.insert(cur) {
                continue;
            }
            self.put_if_changed(cur, &still)?;
            stack.extend(HORIZONTAL.iter().map(|o| cur + *o));
        }
        self.finish("fix liquid")
    }

    /// Replace blocks in the cube of half-size `size` around `pos`.
    pub fn replace_near(
        &mut self,
        pos: IVec3,
        size: i32,
        from: Option<&[BlockFilter]>,
        pattern: &Pattern,
    ) -> Result<usize> {
        self.check_radius(size as f64)?;
        let half = IVec3::splat(size.max(1));
        self.replace_blocks(&Region::cuboid(pos - half, pos + half), from, pattern)
    }

    /// Put out fires around `pos`.
    pub fn extinguish(&mut self, pos: IVec3, radius: i32) -> Result<usize> {
        self.remove_near(pos, id::FIRE, radius)
    }

    /// Smooth the terrain height of the region's columns.
    ///
    /// Heights are filtered with a radius-5 Gaussian kernel, then each column
    /// is stretched or squashed from the region floor to its new height.
    /// Only blocks that actually change are written.
    pub fn smooth(&mut self, region: &Region, iterations: u32, natural_only: bool) -> Result<usize> {
        let map = HeightMap::sample(self, region, natural_only);
        let smoothed = map.filtered(&GaussianKernel::new(5, 1.0), iterations);
        self.begin();
        for column in region.columns() {
            let (Some(current), Some(target)) = (map.height(column), smoothed.height(column)) else {
                continue;
            };
            if current != target {
                self.reshape_column(column, map.floor(), current, target)?;
            }
        }
        self.finish("smooth")
    }

    fn reshape_column(&mut self, column: IVec2, floor: i32, current: i32, target: i32) -> Result<()> {
        let at = |y: i32| IVec3::new(column.x, y, column.y);
        let top = self.block(at(current));
        if target > current {
            // Grow: copy downward so every source is read before it is overwritten
            let scale = (current - floor) as f64 / (target - floor) as f64;
            self.put_if_changed(at(target), &top)?;
            for y in (0..target - floor).rev() {
                let from = self.block(at(floor + (y as f64 * scale) as i32));
                self.put_if_changed(at(floor + y), &from)?;
            }
        } else {
            // Shrink: copy upward, then cap and clear what is left above
            if target > floor {
                let scale = (current - floor) as f64 / (target - floor) as f64;
                for y in 0..target - floor {
                    let from = self.block(at(floor + (y as f64 * scale) as i32));
                    self.put_if_changed(at(floor + y), &from)?;
                }
            }
            self.put_if_changed(at(target), &top)?;
            for y in target + 1..=current {
                self.put_if_changed(at(y), &BaseBlock::AIR)?;
            }
        }
        Ok(())
    }

    /// Clear a square column area from `pos` up `height` blocks.
    pub fn remove_above(&mut self, pos: IVec3, size: i32, height: i32) -> Result<usize> {
        self.check_radius(size as f64)?;
        let top = (pos.y + height - 1).min(self.max_y());
        self.clear_columns(pos, size, pos.y, top, "remove above")
    }

    /// Clear a square column area from `pos` down `height` blocks.
    pub fn remove_below(&mut self, pos: IVec3, size: i32, height: i32) -> Result<usize> {
        self.check_radius(size as f64)?;
        let bottom = (pos.y - height + 1).max(0);
        self.clear_columns(pos, size, bottom, pos.y, "remove below")
    }

    fn clear_columns(&mut self, pos: IVec3, size: i32, bottom: i32, top: i32, operation: &str) -> Result<usize> {
        self.begin();
        let s = size - 1;
        for x in pos.x - s..=pos.x + s {
            for z in pos.z - s..=pos.z + s {
                for y in bottom..=top {
                    let p = IVec3::new(x, y, z);
                    if !self.block(p).is_air() {
                        self.put(p, &BaseBlock::AIR)?;
                    }
                }
            }
        }
        self.finish(operation)
    }

    /// Remove every block of one type within a cube of half-size `size`.
    pub fn remove_near(&mut self, pos: IVec3, block_id: u16, size: i32) -> Result<usize> {
        self.check_radius(size as f64)?;
        self.begin();
        let half = IVec3::splat(size);
        for p in crate::math::Aabb::new(pos - half, pos + half).iter() {
            if self.block(p).id == block_id {
                self.put(p, &BaseBlock::AIR)?;
            }
        }
        self.finish("remove near")
    }

    /// Top-down scan of each column in a horizontal circle. The visitor gets
    /// the first block that stops the scan and returns what to write there.
    fn surface_columns<F>(&mut self, pos: IVec3, radius: f64, operation: &str, mut visit: F) -> Result<usize>
    where
        F: FnMut(&BaseBlock, IVec3, i32) -> Scan,
    {
        self.check_radius(radius)?;
        self.begin();
        let max_y = self.max_y();
        let r = radius.ceil() as i32;
        for x in pos.x - r..=pos.x + r {
            for z in pos.z - r..=pos.z + r {
                if horizontal_distance(IVec3::new(x, pos.y, z), pos) > radius {
                    continue;
                }
                for y in (1..=max_y).rev() {
                    let p = IVec3::new(x, y, z);
                    match visit(&self.block(p), p, max_y) {
                        Scan::Continue => continue,
                        Scan::Stop => break,
                        Scan::Write(at, block) => {
                            self.put_if_changed(at, &block)?;
                            break;
                        }
                    }
                }
            }
        }
        self.finish(operation)
    }

    /// Cover exposed ground with snow and freeze standing water.
    pub fn simulate_snow(&mut self, pos: IVec3, radius: f64) -> Result<usize> {
        self.surface_columns(pos, radius, "snow", |block, p, max_y| match block.id {
            id::AIR => Scan::Continue,
            id::STATIONARY_WATER => Scan::Write(p, BaseBlock::new(id::ICE)),
            _ if p.y == max_y || id::is_liquid(block.id) || id::can_pass_through(block.id) => Scan::Stop,
            _ => Scan::Write(p + IVec3::Y, BaseBlock::new(id::SNOW)),
        })
    }

    /// Melt the top snow layer and ice of each column.
    pub fn thaw(&mut self, pos: IVec3, radius: f64) -> Result<usize> {
        self.surface_columns(pos, radius, "thaw", |block, p, _| match block.id {
            id::AIR => Scan::Continue,
            id::ICE => Scan::Write(p, BaseBlock::new(id::STATIONARY_WATER)),
            id::SNOW => Scan::Write(p, BaseBlock::AIR),
            _ => Scan::Stop,
        })
    }

    /// Turn the top dirt of each column into grass.
    pub fn green(&mut self, pos: IVec3, radius: f64) -> Result<usize> {
        self.surface_columns(pos, radius, "green", |block, p, _| match block.id {
            id::AIR => Scan::Continue,
            id::DIRT => Scan::Write(p, BaseBlock::new(id::GRASS)),
            i if id::is_liquid(i) => Scan::Stop,
            i if id::can_pass_through(i) => Scan::Continue,
            _ => Scan::Stop,
        })
    }

    /// Set the biome of every column the region covers. Biome changes are
    /// not recorded for undo.
    pub fn set_biome(&mut self, region: &Region, biome: BiomeId) -> usize {
        let columns = region.columns();
        for column in &columns {
            self.world_mut().set_biome(*column, biome);
        }
        debug!("biome: {} columns set to {:?}", columns.len(), biome);
        columns.len()
    }

    /// Replace the region with what the world generator would produce.
    ///
    /// The whole region is read from the generator before anything is
    /// written.
    pub fn regenerate(&mut self, region: &Region) -> Result<usize> {
        let mut generated = Vec::with_capacity(region.area());
        for pos in region.iter() {
            match self.world().regenerated_block(pos) {
                Some(block) => generated.push((pos, block)),
                None => return Err(Error::MissingState("This world cannot regenerate terrain")),
            }
        }
        self.begin();
        for (pos, block) in &generated {
            self.put(*pos, block)?;
        }
        self.finish("regenerate")
    }

    /// Remove entities within `radius` of `center`. A negative radius removes
    /// every entity in the world. Entity removal is not undoable.
    pub fn remove_entities_near(&mut self, center: IVec3, radius: i32) -> Result<usize> {
        let region = if radius < 0 {
            Region::cuboid(IVec3::new(i32::MIN, 0, i32::MIN), IVec3::new(i32::MAX, self.max_y(), i32::MAX))
        } else {
            self.check_radius(radius as f64)?;
            Region::cuboid(center - IVec3::splat(radius), center + IVec3::splat(radius))
        };
        let origin = center.as_dvec3() + 0.5;
        let mut removed = 0;
        for (entity, snapshot) in self.world().entities_in(&region) {
            if radius >= 0 && snapshot.position.distance(origin) > radius as f64 {
                continue;
            }
            if self.world_mut().remove_entity(entity) {
                removed += 1;
            }
        }
        debug!("butcher: {} entities removed", removed);
        Ok(removed)
    }
}

/// Outcome of visiting one block in a top-down column scan.
enum Scan {
    Continue,
    Stop,
    Write(IVec3, BaseBlock),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DVec3;
    use crate::world::{EntitySnapshot, MemoryWorld, World};

    fn floor(world: &mut MemoryWorld, y: i32, half: i32, block: u16) {
        world.fill(IVec3::new(-half, y, -half), IVec3::new(half, y, half), &BaseBlock::new(block));
    }

    #[test]
    fn test_fill_xz_fills_pit() {
        let mut world = MemoryWorld::new(64);
        // 3x3 pit, two deep, walled in stone
        world.fill(IVec3::new(-2, 0, -2), IVec3::new(2, 3, 2), &BaseBlock::new(id::STONE));
        world.fill(IVec3::new(-1, 2, -1), IVec3::new(1, 3, 1), &BaseBlock::AIR);
        let mut session = EditSession::new(&mut world);
        let water = Pattern::Single(BaseBlock::new(id::WATER));

        let affected = session.fill_xz(IVec3::new(0, 3, 0), &water, 5.0, 5, false).unwrap();
        assert_eq!(affected, 18);
        assert_eq!(session.block(IVec3::new(1, 2, 1)).id, id::WATER);
    }

    #[test]
    fn test_fill_xz_depth_limit() {
        let mut world = MemoryWorld::new(64);
        floor(&mut world, 0, 3, id::STONE);
        let mut session = EditSession::new(&mut world);
        let water = Pattern::Single(BaseBlock::new(id::WATER));
        let affected = session.fill_xz(IVec3::new(0, 5, 0), &water, 0.0, 2, false).unwrap();
        // Single column, y=5 and y=4 only
        assert_eq!(affected, 2);
        assert!(session.block(IVec3::new(0, 3, 0)).is_air());
    }

    #[test]
    fn test_recursive_fill_stays_below_origin() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::new(-3, 0, -3), IVec3::new(3, 4, 3), &BaseBlock::new(id::STONE));
        world.fill(IVec3::new(0, 1, 0), IVec3::new(0, 4, 0), &BaseBlock::AIR);
        world.fill(IVec3::new(0, 1, 0), IVec3::new(2, 1, 0), &BaseBlock::AIR);
        let mut session = EditSession::new(&mut world);
        let water = Pattern::Single(BaseBlock::new(id::WATER));

        let affected = session.fill_xz(IVec3::new(0, 4, 0), &water, 10.0, 10, true).unwrap();
        // Shaft of 4 plus the side tunnel of 2
        assert_eq!(affected, 6);
        assert_eq!(session.block(IVec3::new(2, 1, 0)).id, id::WATER);
    }

    #[test]
    fn test_drain_connected_liquid() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::new(0, 1, 0), IVec3::new(4, 1, 0), &BaseBlock::new(id::STATIONARY_WATER));
        world.set_block(IVec3::new(10, 1, 0), &BaseBlock::new(id::WATER), false);
        let mut session = EditSession::new(&mut world);

        let affected = session.drain_area(IVec3::new(0, 1, 0), 3.0).unwrap();
        assert_eq!(affected, 4);
        assert!(session.block(IVec3::new(3, 1, 0)).is_air());
        assert_eq!(session.block(IVec3::new(4, 1, 0)).id, id::STATIONARY_WATER);
        assert_eq!(session.block(IVec3::new(10, 1, 0)).id, id::WATER);
    }

    #[test]
    fn test_flood_radius_checked_before_work() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::new(0, 1, 0), IVec3::new(4, 1, 0), &BaseBlock::new(id::WATER));
        let mut session = EditSession::new(&mut world)
            .with_max_radius(Some(5.0))
            .with_change_limit(Some(5000));
        let stone = Pattern::Single(BaseBlock::new(id::STONE));
        let origin = IVec3::new(0, 10, 0);

        for radius in [6.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                session.fill_xz(origin, &stone, radius, 1, true),
                Err(Error::LimitExceeded { what: "radius", .. })
            ));
            assert!(matches!(
                session.fill_xz(origin, &stone, radius, 1, false),
                Err(Error::LimitExceeded { .. })
            ));
            assert!(matches!(
                session.drain_area(IVec3::new(0, 1, 0), radius),
                Err(Error::LimitExceeded { .. })
            ));
            assert!(matches!(
                session.fix_liquid(IVec3::new(0, 1, 0), radius, id::WATER, id::STATIONARY_WATER),
                Err(Error::LimitExceeded { .. })
            ));
        }
        assert_eq!(session.change_count(), 0);
    }

    #[test]
    fn test_non_finite_radius_rejected_without_bound() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let stone = Pattern::Single(BaseBlock::new(id::STONE));
        assert!(session.fill_xz(IVec3::new(0, 10, 0), &stone, f64::NAN, 1, true).is_err());
        assert!(session.simulate_snow(IVec3::ZERO, f64::INFINITY).is_err());
        assert_eq!(session.change_count(), 0);
    }

    #[test]
    fn test_fix_liquid_settles_channel() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::new(-6, 0, -6), IVec3::new(6, 1, 6), &BaseBlock::new(id::STONE));
        world.fill(IVec3::new(0, 1, 0), IVec3::new(6, 1, 0), &BaseBlock::AIR);
        world.fill(IVec3::new(0, 1, 0), IVec3::new(3, 1, 0), &BaseBlock::new(id::WATER));
        world.set_block(IVec3::new(4, 1, 0), &BaseBlock::new(id::STATIONARY_WATER), false);
        let mut session = EditSession::new(&mut world);

        let affected = session
            .fix_liquid(IVec3::new(0, 1, 0), 5.0, id::WATER, id::STATIONARY_WATER)
            .unwrap();
        // Four moving blocks settle and the air gap at x=5 fills
        assert_eq!(affected, 5);
        for x in 0..=5 {
            assert_eq!(session.block(IVec3::new(x, 1, 0)).id, id::STATIONARY_WATER);
        }
        assert!(session.block(IVec3::new(6, 1, 0)).is_air());
        assert!(session.block(IVec3::new(0, 2, 0)).is_air());
    }

    #[test]
    fn test_replace_near_and_extinguish() {
        let mut world = MemoryWorld::new(64);
        world.set_block(IVec3::new(0, 1, 0), &BaseBlock::new(id::STONE), false);
        world.set_block(IVec3::new(3, 1, 0), &BaseBlock::new(id::STONE), false);
        world.set_block(IVec3::new(6, 1, 0), &BaseBlock::new(id::STONE), false);
        world.set_block(IVec3::new(1, 2, 1), &BaseBlock::new(id::FIRE), false);
        let mut session = EditSession::new(&mut world);

        let from = [BlockFilter::any_data(id::STONE)];
        let dirt = Pattern::Single(BaseBlock::new(id::DIRT));
        assert_eq!(session.replace_near(IVec3::new(0, 1, 0), 3, Some(&from), &dirt).unwrap(), 2);
        assert_eq!(session.block(IVec3::new(3, 1, 0)).id, id::DIRT);
        assert_eq!(session.block(IVec3::new(6, 1, 0)).id, id::STONE);

        assert_eq!(session.extinguish(IVec3::new(0, 1, 0), 2).unwrap(), 1);
        assert!(session.block(IVec3::new(1, 2, 1)).is_air());
    }

    #[test]
    fn test_smooth_flattens_spike() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::new(-5, 0, -5), IVec3::new(5, 4, 5), &BaseBlock::new(id::STONE));
        world.fill(IVec3::new(0, 5, 0), IVec3::new(0, 10, 0), &BaseBlock::new(id::STONE));
        let region = Region::cuboid(IVec3::new(-5, 0, -5), IVec3::new(5, 12, 5));
        let mut session = EditSession::new(&mut world);

        let affected = session.smooth(&region, 1, false).unwrap();
        // The spike drops to y=5 and its four face neighbours rise by one
        assert_eq!(affected, 9);
        assert_eq!(session.block(IVec3::new(0, 5, 0)).id, id::STONE);
        assert!(session.block(IVec3::new(0, 6, 0)).is_air());
        assert_eq!(session.block(IVec3::new(1, 5, 0)).id, id::STONE);
        assert_eq!(session.block(IVec3::new(0, 5, -1)).id, id::STONE);
        assert!(session.block(IVec3::new(1, 5, 1)).is_air());
        assert!(session.block(IVec3::new(2, 5, 0)).is_air());
    }

    #[test]
    fn test_remove_above_and_below() {
        let mut world = MemoryWorld::new(64);
        world.fill(IVec3::new(-3, 0, -3), IVec3::new(3, 10, 3), &BaseBlock::new(id::DIRT));
        let mut session = EditSession::new(&mut world);

        // size 2 covers a 3x3 area
        assert_eq!(session.remove_above(IVec3::new(0, 5, 0), 2, 3).unwrap(), 27);
        assert!(session.block(IVec3::new(1, 7, 1)).is_air());
        assert_eq!(session.block(IVec3::new(1, 8, 1)).id, id::DIRT);

        assert_eq!(session.remove_below(IVec3::new(0, 2, 0), 1, 10).unwrap(), 3);
        assert!(session.block(IVec3::new(0, 0, 0)).is_air());
    }

    #[test]
    fn test_remove_near() {
        let mut world = MemoryWorld::new(64);
        world.set_block(IVec3::new(1, 1, 1), &BaseBlock::new(id::FIRE), false);
        world.set_block(IVec3::new(-2, 1, 0), &BaseBlock::new(id::FIRE), false);
        world.set_block(IVec3::new(0, 1, 0), &BaseBlock::new(id::STONE), false);
        let mut session = EditSession::new(&mut world);
        assert_eq!(session.remove_near(IVec3::new(0, 1, 0), id::FIRE, 1).unwrap(), 1);
        assert_eq!(session.block(IVec3::new(-2, 1, 0)).id, id::FIRE);
        assert_eq!(session.block(IVec3::new(0, 1, 0)).id, id::STONE);
    }

    #[test]
    fn test_snow_then_thaw() {
        let mut world = MemoryWorld::new(64);
        floor(&mut world, 1, 2, id::GRASS);
        world.set_block(IVec3::new(1, 1, 0), &BaseBlock::new(id::STATIONARY_WATER), false);
        world.set_block(IVec3::new(0, 2, 1), &BaseBlock::new(id::RED_FLOWER), false);
        let mut session = EditSession::new(&mut world);

        let snowed = session.simulate_snow(IVec3::new(0, 1, 0), 1.0).unwrap();
        // Five columns: three snow, one ice, one flower left alone
        assert_eq!(snowed, 4);
        assert_eq!(session.block(IVec3::new(0, 2, 0)).id, id::SNOW);
        assert_eq!(session.block(IVec3::new(1, 1, 0)).id, id::ICE);
        assert_eq!(session.block(IVec3::new(0, 2, 1)).id, id::RED_FLOWER);

        assert_eq!(session.thaw(IVec3::new(0, 1, 0), 1.0).unwrap(), 4);
        assert!(session.block(IVec3::new(0, 2, 0)).is_air());
        assert_eq!(session.block(IVec3::new(1, 1, 0)).id, id::STATIONARY_WATER);
        assert_eq!(session.thaw(IVec3::new(0, 1, 0), 1.0).unwrap(), 0);
    }

    #[test]
    fn test_green_skips_plants() {
        let mut world = MemoryWorld::new(64);
        floor(&mut world, 1, 0, id::DIRT);
        world.set_block(IVec3::new(0, 2, 0), &BaseBlock::new(id::LONG_GRASS), false);
        world.set_block(IVec3::new(1, 1, 0), &BaseBlock::new(id::STONE), false);
        let mut session = EditSession::new(&mut world);

        assert_eq!(session.green(IVec3::new(0, 1, 0), 1.0).unwrap(), 1);
        assert_eq!(session.block(IVec3::new(0, 1, 0)).id, id::GRASS);
        assert_eq!(session.block(IVec3::new(1, 1, 0)).id, id::STONE);
        assert_eq!(session.green(IVec3::new(0, 1, 0), 1.0).unwrap(), 0);
    }

    #[test]
    fn test_set_biome_per_column() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::new(2, 5, 1));
        assert_eq!(session.set_biome(&region, BiomeId::DESERT), 6);
        assert_eq!(session.change_count(), 0);
        drop(session);
        assert_eq!(world.biome(IVec2::new(2, 1)), BiomeId::DESERT);
        assert_eq!(world.biome(IVec2::new(3, 1)), BiomeId::default());
    }

    #[test]
    fn test_regenerate_is_undoable() {
        fn flat(pos: IVec3) -> BaseBlock {
            if pos.y < 2 { BaseBlock::new(id::STONE) } else { BaseBlock::AIR }
        }
        let mut world = MemoryWorld::new(64).with_generator(flat);
        world.set_block(IVec3::new(0, 1, 0), &BaseBlock::new(id::GLASS), false);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::new(0, 3, 0));

        assert_eq!(session.regenerate(&region).unwrap(), 4);
        assert_eq!(session.block(IVec3::new(0, 1, 0)).id, id::STONE);
        assert_eq!(session.changes().get(IVec3::new(0, 1, 0)).unwrap().before.id, id::GLASS);
    }

    #[test]
    fn test_regenerate_without_generator() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::ONE);
        assert!(matches!(session.regenerate(&region), Err(Error::MissingState(_))));
        assert_eq!(session.change_count(), 0);
    }

    #[test]
    fn test_butcher() {
        let mut world = MemoryWorld::new(64);
        world.spawn_entity(EntitySnapshot::new("zombie", DVec3::new(2.5, 1.0, 0.5)));
        world.spawn_entity(EntitySnapshot::new("skeleton", DVec3::new(30.5, 1.0, 0.5)));
        world.spawn_entity(EntitySnapshot::new("creeper", DVec3::new(-60.5, 1.0, 0.5)));
        let mut session = EditSession::new(&mut world);

        assert_eq!(session.remove_entities_near(IVec3::ZERO, 5).unwrap(), 1);
        assert_eq!(session.remove_entities_near(IVec3::ZERO, -1).unwrap(), 2);
        drop(session);
        assert_eq!(world.entity_count(), 0);
    }
}
