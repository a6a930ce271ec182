//! Axis-aligned block box

use crate::core::types::{DVec3, IVec3};

/// Inclusive axis-aligned box on the block grid.
///
/// `min <= max` holds componentwise for every box built through [`Aabb::new`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aabb {
    pub min: IVec3,
    pub max: IVec3,
}

impl Aabb {
    /// Create box spanning two corners in any order
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Single-block box
    pub fn point(p: IVec3) -> Self {
        Self { min: p, max: p }
    }

    /// Create box from center and half-extents (in blocks)
    pub fn from_center_half_extent(center: IVec3, half_extent: IVec3) -> Self {
        Self::new(center - half_extent, center + half_extent)
    }

    /// Get center point
    pub fn center(&self) -> DVec3 {
        (self.min.as_dvec3() + self.max.as_dvec3()) * 0.5
    }

    /// Number of blocks along each axis
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Total number of blocks
    pub fn volume(&self) -> usize {
        let s = self.size().as_i64vec3();
        (s.x * s.y * s.z) as usize
    }

    /// Check if block is inside box
    pub fn contains_point(&self, p: IVec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Check if two boxes share at least one block
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Grow box to include point
    pub fn include(&mut self, point: IVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Return merged box containing both
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Translate both corners
    pub fn shifted(&self, offset: IVec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Box grown by `amount` blocks on every side
    pub fn padded(&self, amount: i32) -> Aabb {
        Aabb {
            min: self.min - IVec3::splat(amount),
            max: self.max + IVec3::splat(amount),
        }
    }

    /// Blocks in lexicographic order: x outermost, then y, then z.
    pub fn iter(&self) -> AabbIter {
        AabbIter {
            bounds: *self,
            next: Some(self.min),
        }
    }
}

/// Restartable lexicographic walk over an [`Aabb`].
#[derive(Clone, Debug)]
pub struct AabbIter {
    bounds: Aabb,
    next: Option<IVec3>,
}

impl Iterator for AabbIter {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        let current = self.next?;
        let b = &self.bounds;

        let mut n = current;
        n.z += 1;
        if n.z > b.max.z {
            n.z = b.min.z;
            n.y += 1;
            if n.y > b.max.y {
                n.y = b.min.y;
                n.x += 1;
            }
        }
        self.next = (n.x <= b.max.x).then_some(n);

        Some(current)
    }
}
