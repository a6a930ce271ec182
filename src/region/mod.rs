//! Regions: finite sets of block positions with a geometric shape.
//!
//! [`Region`] is a closed sum over the supported shapes. Every variant
//! reports its bounding box, tests containment and iterates its positions in
//! the same deterministic order (x outer, then y, then z), which edit
//! operations rely on for reproducible "first N" behavior and column
//! deduplication.

pub mod cuboid;
pub mod cylinder;
pub mod ellipsoid;
pub mod polygonal;
pub mod selector;

use std::collections::HashSet;

use crate::core::types::{DVec3, IVec2, IVec3, Result};
use crate::math::Aabb;

pub use cuboid::CuboidRegion;
pub use cylinder::CylinderRegion;
pub use ellipsoid::EllipsoidRegion;
pub use polygonal::PolygonalRegion;
pub use selector::{RegionSelector, SelectionState, SelectorKind};

#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    Cuboid(CuboidRegion),
    Cylinder(CylinderRegion),
    Ellipsoid(EllipsoidRegion),
    Polygonal(PolygonalRegion),
}

impl Region {
    /// Shorthand for a cuboid between two corners
    pub fn cuboid(a: IVec3, b: IVec3) -> Self {
        Region::Cuboid(CuboidRegion::new(a, b))
    }

    pub fn min(&self) -> IVec3 {
        match self {
            Region::Cuboid(r) => r.min(),
            Region::Cylinder(r) => r.min(),
            Region::Ellipsoid(r) => r.min(),
            Region::Polygonal(r) => r.min(),
        }
    }

    pub fn max(&self) -> IVec3 {
        match self {
            Region::Cuboid(r) => r.max(),
            Region::Cylinder(r) => r.max(),
            Region::Ellipsoid(r) => r.max(),
            Region::Polygonal(r) => r.max(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.min(), self.max())
    }

    /// Bounding box dimensions (width, height, length)
    pub fn size(&self) -> IVec3 {
        self.bounds().size()
    }

    pub fn contains(&self, p: IVec3) -> bool {
        match self {
            Region::Cuboid(r) => r.contains(p),
            Region::Cylinder(r) => r.contains(p),
            Region::Ellipsoid(r) => r.contains(p),
            Region::Polygonal(r) => r.contains(p),
        }
    }

    /// Number of contained positions
    pub fn area(&self) -> usize {
        match self {
            Region::Cuboid(r) => r.area(),
            _ => self.iter().count(),
        }
    }

    /// Contained positions, x outer, then y, then z.
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        let whole_box = matches!(self, Region::Cuboid(_));
        self.bounds()
            .iter()
            .filter(move |p| whole_box || self.contains(*p))
    }

    /// Distinct (x, z) columns in first-visit order
    pub fn columns(&self) -> Vec<IVec2> {
        let mut seen = HashSet::new();
        self.iter()
            .map(|p| IVec2::new(p.x, p.z))
            .filter(|c| seen.insert(*c))
            .collect()
    }

    pub fn center(&self) -> DVec3 {
        match self {
            Region::Cuboid(r) => r.bounds().center(),
            Region::Cylinder(r) => r.center(),
            Region::Ellipsoid(r) => r.center.as_dvec3(),
            Region::Polygonal(r) => r.center(),
        }
    }

    /// Grow along every change vector. Fails without mutating on a change
    /// the shape cannot take.
    pub fn expand(&mut self, changes: &[IVec3]) -> Result<()> {
        match self {
            Region::Cuboid(r) => r.expand(changes),
            Region::Cylinder(r) => r.expand(changes),
            Region::Ellipsoid(r) => r.expand(changes),
            Region::Polygonal(r) => r.expand(changes),
        }
    }

    /// Inverse of [`expand`](Self::expand). Inverted bounds are an error and
    /// leave the region untouched.
    pub fn contract(&mut self, changes: &[IVec3]) -> Result<()> {
        match self {
            Region::Cuboid(r) => r.contract(changes),
            Region::Cylinder(r) => r.contract(changes),
            Region::Ellipsoid(r) => r.contract(changes),
            Region::Polygonal(r) => r.contract(changes),
        }
    }

    pub fn shift(&mut self, offset: IVec3) {
        match self {
            Region::Cuboid(r) => r.shift(offset),
            Region::Cylinder(r) => r.shift(offset),
            Region::Ellipsoid(r) => r.shift(offset),
            Region::Polygonal(r) => r.shift(offset),
        }
    }

    /// Stretch the region over the full world height `0..=max_y`.
    pub fn expand_vertically(&mut self, max_y: i32) -> Result<()> {
        match self {
            Region::Cuboid(r) => r.set_vertical_range(0, max_y),
            Region::Cylinder(r) => {
                r.min_y = 0;
                r.max_y = max_y;
            }
            Region::Polygonal(r) => {
                r.min_y = 0;
                r.max_y = max_y;
            }
            Region::Ellipsoid(r) => {
                let grow = max_y + 1;
                r.expand(&[IVec3::new(0, grow, 0), IVec3::new(0, -grow, 0)])?;
            }
        }
        Ok(())
    }

    /// Expand by `amount` in every selected direction at once.
    pub fn outset(&mut self, amount: i32, horizontal: bool, vertical: bool) -> Result<()> {
        self.expand(&all_directions(amount, horizontal, vertical))
    }

    /// Contract by `amount` in every selected direction at once.
    pub fn inset(&mut self, amount: i32, horizontal: bool, vertical: bool) -> Result<()> {
        self.contract(&all_directions(amount, horizontal, vertical))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Region::Cuboid(_) => "cuboid",
            Region::Cylinder(_) => "cylinder",
            Region::Ellipsoid(_) => "ellipsoid",
            Region::Polygonal(_) => "2D polygon",
        }
    }

    /// Human-readable description of the shape, one fact per line.
    pub fn info_lines(&self) -> Vec<String> {
        let mut lines = match self {
            Region::Cuboid(r) => vec![
                format!("First position: {}", fmt_pos(r.pos1())),
                format!("Second position: {}", fmt_pos(r.pos2())),
            ],
            Region::Cylinder(r) => vec![
                format!("Center: ({}, {})", r.center.x, r.center.y),
                format!("Radius: {:.1}/{:.1}", r.radius.x, r.radius.y),
                format!("Height: {} - {}", r.min_y, r.max_y),
            ],
            Region::Ellipsoid(r) => vec![
                format!("Center: {}", fmt_pos(r.center)),
                format!(
                    "X/Y/Z radius: {:.1}/{:.1}/{:.1}",
                    r.radius.x, r.radius.y, r.radius.z
                ),
            ],
            Region::Polygonal(r) => vec![
                format!("# points: {}", r.points().len()),
                format!("Height: {} - {}", r.min_y, r.max_y),
            ],
        };
        let size = self.size();
        lines.push(format!("Size: {} x {} x {}", size.x, size.y, size.z));
        lines
    }
}

fn all_directions(amount: i32, horizontal: bool, vertical: bool) -> Vec<IVec3> {
    let mut changes = Vec::with_capacity(6);
    if horizontal {
        changes.push(IVec3::new(amount, 0, 0));
        changes.push(IVec3::new(-amount, 0, 0));
        changes.push(IVec3::new(0, 0, amount));
        changes.push(IVec3::new(0, 0, -amount));
    }
    if vertical {
        changes.push(IVec3::new(0, amount, 0));
        changes.push(IVec3::new(0, -amount, 0));
    }
    changes
}

pub(crate) fn fmt_pos(p: IVec3) -> String {
    format!("({}, {}, {})", p.x, p.y, p.z)
}
