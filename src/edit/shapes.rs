//! Shape generation: cylinders, ellipsoids, pyramids, formula-driven shapes
//! and deformation.
//!
//! Generators enumerate every offset of the shape's bounding range once and
//! test it directly, so each position is written exactly once.

use std::collections::HashMap;

use crate::block::BaseBlock;
use crate::core::types::{DVec3, IVec3, Result};
use crate::expression::Expression;
use crate::pattern::Pattern;
use crate::region::Region;

use super::region_ops::NEIGHBORS;
use super::session::EditSession;

/// Coordinate system handed to formula variables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeFrame {
    /// World coordinates
    Raw,
    /// World coordinates relative to a placement position
    Offset(IVec3),
    /// Relative to the region's center, one unit per block
    Center,
    /// Region's bounding box mapped onto -1..1 per axis
    Normalized,
}

impl ShapeFrame {
    /// Origin and per-axis scale for this frame over a region
    pub fn resolve(&self, region: &Region) -> (DVec3, DVec3) {
        match self {
            ShapeFrame::Raw => (DVec3::ZERO, DVec3::ONE),
            ShapeFrame::Offset(origin) => (origin.as_dvec3(), DVec3::ONE),
            ShapeFrame::Center => (region.bounds().center(), DVec3::ONE),
            ShapeFrame::Normalized => {
                let zero = region.bounds().center();
                let unit = region.max().as_dvec3() - zero;
                let unit = DVec3::select(unit.cmpeq(DVec3::ZERO), DVec3::ONE, unit);
                (zero, unit)
            }
        }
    }
}

fn length_sq(x: f64, y: f64, z: f64) -> f64 {
    x * x + y * y + z * z
}

impl<'a> EditSession<'a> {
    /// Elliptic cylinder standing on `pos`. A negative height grows
    /// downward. Hollow cylinders keep only the outer ring.
    pub fn make_cylinder(
        &mut self,
        pos: IVec3,
        pattern: &Pattern,
        radius_x: f64,
        radius_z: f64,
        height: i32,
        filled: bool,
    ) -> Result<usize> {
        for radius in [radius_x, radius_z] {
            self.check_radius(radius)?;
        }
        self.begin();
        if height == 0 {
            return self.finish("cylinder");
        }
        let (base, height) = if height < 0 {
            (pos.y + height, -height)
        } else {
            (pos.y, height)
        };
        let bottom = base.max(0);
        let top = (base + height - 1).min(self.max_y());

        let rx = radius_x + 0.5;
        let rz = radius_z + 0.5;
        let (ceil_x, ceil_z) = (rx.ceil() as i32, rz.ceil() as i32);

        for dx in -ceil_x..=ceil_x {
            for dz in -ceil_z..=ceil_z {
                let xn = dx.abs() as f64 / rx;
                let zn = dz.abs() as f64 / rz;
                if length_sq(xn, 0.0, zn) > 1.0 {
                    continue;
                }
                if !filled {
                    let next_xn = (dx.abs() + 1) as f64 / rx;
                    let next_zn = (dz.abs() + 1) as f64 / rz;
                    if length_sq(next_xn, 0.0, zn) <= 1.0 && length_sq(xn, 0.0, next_zn) <= 1.0 {
                        continue;
                    }
                }
                for y in bottom..=top {
                    let p = IVec3::new(pos.x + dx, y, pos.z + dz);
                    self.put(p, &pattern.next(p))?;
                }
            }
        }
        self.finish("cylinder")
    }

    /// Ellipsoid centered on `pos`. Hollow ellipsoids keep only the outer
    /// one-block shell.
    pub fn make_sphere(
        &mut self,
        pos: IVec3,
        pattern: &Pattern,
        radius_x: f64,
        radius_y: f64,
        radius_z: f64,
        filled: bool,
    ) -> Result<usize> {
        for radius in [radius_x, radius_y, radius_z] {
            self.check_radius(radius)?;
        }
        self.begin();
        let r = DVec3::new(radius_x, radius_y, radius_z) + 0.5;
        let ceil = r.ceil().as_ivec3();

        for dx in -ceil.x..=ceil.x {
            for dy in -ceil.y..=ceil.y {
                for dz in -ceil.z..=ceil.z {
                    let a = IVec3::new(dx, dy, dz).abs().as_dvec3();
                    let n = a / r;
                    if length_sq(n.x, n.y, n.z) > 1.0 {
                        continue;
                    }
                    if !filled {
                        let next = (a + 1.0) / r;
                        if length_sq(next.x, n.y, n.z) <= 1.0
                            && length_sq(n.x, next.y, n.z) <= 1.0
                            && length_sq(n.x, n.y, next.z) <= 1.0
                        {
                            continue;
                        }
                    }
                    let p = pos + IVec3::new(dx, dy, dz);
                    self.put(p, &pattern.next(p))?;
                }
            }
        }
        self.finish("sphere")
    }

    /// Stepped pyramid with its base centered on `pos`, `size` layers high.
    pub fn make_pyramid(&mut self, pos: IVec3, pattern: &Pattern, size: i32, filled: bool) -> Result<usize> {
        self.check_radius(size as f64)?;
        self.begin();
        for y in 0..size {
            let s = size - 1 - y;
            for dx in -s..=s {
                for dz in -s..=s {
                    if filled || dx.abs() == s || dz.abs() == s {
                        let p = pos + IVec3::new(dx, y, dz);
                        self.put(p, &pattern.next(p))?;
                    }
                }
            }
        }
        self.finish("pyramid")
    }

    /// Generate a shape from a formula over `x, y, z, type, data`.
    ///
    /// Coordinates are `(pos - zero) / unit`. A positive result includes the
    /// position. Assigning `type` or `data` overrides the pattern's block.
    /// Hollow shapes keep only included positions next to an excluded one.
    pub fn make_shape(
        &mut self,
        region: &Region,
        zero: DVec3,
        unit: DVec3,
        pattern: &Pattern,
        formula: &str,
        hollow: bool,
    ) -> Result<usize> {
        let expression = Expression::compile(formula, &["x", "y", "z", "type", "data"])?;
        self.begin();

        let mut included: HashMap<IVec3, BaseBlock> = HashMap::new();
        let mut order = Vec::new();
        for pos in region.iter() {
            let block = pattern.next(pos);
            let scaled = (pos.as_dvec3() - zero) / unit;
            let (id, data) = (block.id as f64, block.data as f64);
            let mut slots = [scaled.x, scaled.y, scaled.z, id, data];
            if expression.evaluate(&mut slots) <= 0.0 {
                continue;
            }
            let material = if slots[3] == id && slots[4] == data {
                block
            } else {
                BaseBlock::with_data(slots[3] as u16, slots[4] as u8)
            };
            included.insert(pos, material);
            order.push(pos);
        }

        for pos in order {
            if hollow && NEIGHBORS.iter().all(|o| included.contains_key(&(pos + *o))) {
                continue;
            }
            if let Some(block) = included.get(&pos) {
                self.put(pos, block)?;
            }
        }
        self.finish("shape")
    }

    /// Rebuild the region from a formula mapping each position to a source.
    ///
    /// The formula receives `x, y, z` as `(pos - zero) / unit` and leaves the
    /// source coordinate in the same variables. Every source is read before
    /// anything is written.
    pub fn deform_region(&mut self, region: &Region, zero: DVec3, unit: DVec3, formula: &str) -> Result<usize> {
        let expression = Expression::compile(formula, &["x", "y", "z"])?;
        self.begin();

        let mut queue = Vec::new();
        for pos in region.iter() {
            let scaled = (pos.as_dvec3() - zero) / unit;
            let mut slots = [scaled.x, scaled.y, scaled.z];
            expression.evaluate(&mut slots);
            let source = (DVec3::from_array(slots) * unit + zero + 0.5).floor().as_ivec3();
            queue.push((pos, self.block(source)));
        }
        for (pos, block) in &queue {
            self.put(*pos, block)?;
        }
        self.finish("deform")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::id;
    use crate::core::error::Error;
    use crate::expression::ExpressionError;
    use crate::world::{MemoryWorld, World};

    fn stone() -> Pattern {
        Pattern::Single(BaseBlock::new(id::STONE))
    }

    #[test]
    fn test_cylinder_counts_each_block_once() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let affected = session.make_cylinder(IVec3::new(0, 10, 0), &stone(), 0.0, 0.0, 3, true).unwrap();
        assert_eq!(affected, 3);
        assert_eq!(session.change_count(), 3);

        let affected = session.make_cylinder(IVec3::new(20, 10, 0), &stone(), 2.0, 2.0, 1, true).unwrap();
        assert_eq!(affected, session.changes().len() - 3);
        assert_eq!(session.block(IVec3::new(22, 10, 0)).id, id::STONE);
        assert!(session.block(IVec3::new(22, 10, 2)).is_air());
    }

    #[test]
    fn test_cylinder_negative_height_and_clamp() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let affected = session.make_cylinder(IVec3::new(0, 1, 0), &stone(), 0.0, 0.0, -5, true).unwrap();
        // Base shifted to y=-4, clamped at 0: rows 0..=0
        assert_eq!(affected, 1);
        assert_eq!(session.block(IVec3::ZERO).id, id::STONE);
        assert_eq!(session.make_cylinder(IVec3::ZERO, &stone(), 1.0, 1.0, 0, true).unwrap(), 0);
    }

    #[test]
    fn test_hollow_cylinder_is_ring() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        session.make_cylinder(IVec3::new(0, 5, 0), &stone(), 3.0, 3.0, 1, false).unwrap();
        assert!(session.block(IVec3::new(0, 5, 0)).is_air());
        assert_eq!(session.block(IVec3::new(3, 5, 0)).id, id::STONE);
    }

    #[test]
    fn test_sphere_matches_ellipsoid_region() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let center = IVec3::new(0, 20, 0);
        let affected = session.make_sphere(center, &stone(), 3.0, 3.0, 3.0, true).unwrap();
        let region = Region::Ellipsoid(crate::region::EllipsoidRegion::sphere(center, 3.0));
        assert_eq!(affected, region.area());
    }

    #[test]
    fn test_hollow_sphere_has_empty_core() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let center = IVec3::new(0, 20, 0);
        let filled = session.make_sphere(center, &stone(), 4.0, 4.0, 4.0, true).unwrap();
        drop(session);

        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let hollow = session.make_sphere(center, &stone(), 4.0, 4.0, 4.0, false).unwrap();
        assert!(hollow < filled);
        assert!(session.block(center).is_air());
        assert_eq!(session.block(center + IVec3::new(4, 0, 0)).id, id::STONE);
    }

    #[test]
    fn test_sphere_radius_limit() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world).with_max_radius(Some(5.0));
        let err = session.make_sphere(IVec3::new(0, 20, 0), &stone(), 6.0, 6.0, 6.0, true);
        assert!(matches!(err, Err(Error::LimitExceeded { .. })));
        assert_eq!(session.change_count(), 0);
    }

    #[test]
    fn test_pyramid() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        // 5x5 + 3x3 + 1
        assert_eq!(session.make_pyramid(IVec3::ZERO, &stone(), 3, true).unwrap(), 35);
        drop(session);

        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        // 16 + 8 + 1
        assert_eq!(session.make_pyramid(IVec3::ZERO, &stone(), 3, false).unwrap(), 25);
    }

    #[test]
    fn test_make_shape_sphere_formula() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::new(-2, 0, -2), IVec3::new(2, 4, 2));
        let (zero, unit) = ShapeFrame::Center.resolve(&region);
        let affected = session
            .make_shape(&region, zero, unit, &stone(), "x*x + y*y + z*z <= 1", false)
            .unwrap();
        // Center plus its six neighbours
        assert_eq!(affected, 7);
        assert_eq!(session.block(IVec3::new(0, 2, 0)).id, id::STONE);
    }

    #[test]
    fn test_make_shape_assigns_material() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::new(1, 0, 0));
        session
            .make_shape(&region, DVec3::ZERO, DVec3::ONE, &stone(), "type = 35; data = x + 1; 1", false)
            .unwrap();
        assert_eq!(session.block(IVec3::new(1, 0, 0)), BaseBlock::with_data(id::WOOL, 2));
    }

    #[test]
    fn test_make_shape_hollow() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::splat(4));
        let affected = session
            .make_shape(&region, DVec3::ZERO, DVec3::ONE, &stone(), "1", true)
            .unwrap();
        assert_eq!(affected, 98);
    }

    #[test]
    fn test_bad_formula_aborts_before_writes() {
        let mut world = MemoryWorld::new(64);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::ONE);
        let err = session.make_shape(&region, DVec3::ZERO, DVec3::ONE, &stone(), "x +", false);
        assert!(matches!(err, Err(Error::Expression(ExpressionError::UnexpectedEnd { .. }))));
        assert_eq!(session.change_count(), 0);
    }

    #[test]
    fn test_deform_shift_reads_before_writing() {
        let mut world = MemoryWorld::new(64);
        world.set_block(IVec3::new(0, 0, 0), &BaseBlock::new(id::STONE), false);
        world.set_block(IVec3::new(1, 0, 0), &BaseBlock::new(id::DIRT), false);
        let mut session = EditSession::new(&mut world);
        let region = Region::cuboid(IVec3::ZERO, IVec3::new(2, 0, 0));

        // Every position takes the block one step in -x
        let affected = session.deform_region(&region, DVec3::ZERO, DVec3::ONE, "x -= 1").unwrap();
        assert_eq!(affected, 3);
        assert!(session.block(IVec3::new(0, 0, 0)).is_air());
        assert_eq!(session.block(IVec3::new(1, 0, 0)).id, id::STONE);
        assert_eq!(session.block(IVec3::new(2, 0, 0)).id, id::DIRT);
    }

    #[test]
    fn test_normalized_frame() {
        let region = Region::cuboid(IVec3::ZERO, IVec3::new(4, 0, 2));
        let (zero, unit) = ShapeFrame::Normalized.resolve(&region);
        assert_eq!(zero, DVec3::new(2.0, 0.0, 1.0));
        assert_eq!(unit, DVec3::new(2.0, 1.0, 1.0));
    }
}
