//! Box region spanned by two corner picks.

use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::math::Aabb;

/// Cuboid between two corners. The corners keep their identity (which one was
/// picked first) so selectors can report them back unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CuboidRegion {
    pos1: IVec3,
    pos2: IVec3,
}

impl CuboidRegion {
    pub fn new(pos1: IVec3, pos2: IVec3) -> Self {
        Self { pos1, pos2 }
    }

    pub fn pos1(&self) -> IVec3 {
        self.pos1
    }

    pub fn pos2(&self) -> IVec3 {
        self.pos2
    }

    pub fn set_pos1(&mut self, pos: IVec3) {
        self.pos1 = pos;
    }

    pub fn set_pos2(&mut self, pos: IVec3) {
        self.pos2 = pos;
    }

    pub fn min(&self) -> IVec3 {
        self.pos1.min(self.pos2)
    }

    pub fn max(&self) -> IVec3 {
        self.pos1.max(self.pos2)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos1, self.pos2)
    }

    pub fn area(&self) -> usize {
        self.bounds().volume()
    }

    pub fn contains(&self, p: IVec3) -> bool {
        self.bounds().contains_point(p)
    }

    /// Grow toward each change vector: positive components push the max face
    /// out, negative components push the min face out.
    pub fn expand(&mut self, changes: &[IVec3]) -> Result<()> {
        for change in changes {
            for axis in 0..3 {
                let c = change[axis];
                if c > 0 {
                    *self.max_corner_mut(axis) += c;
                } else if c < 0 {
                    *self.min_corner_mut(axis) += c;
                }
            }
        }
        Ok(())
    }

    /// Exact inverse of [`expand`](Self::expand): positive components pull the
    /// max face in, negative components pull the min face in. Fails without
    /// touching the region if any face would cross the opposite one.
    pub fn contract(&mut self, changes: &[IVec3]) -> Result<()> {
        let mut next = *self;
        for change in changes {
            for axis in 0..3 {
                let c = change[axis];
                if c > 0 {
                    let floor = next.min()[axis];
                    let face = next.max_corner_mut(axis);
                    *face -= c;
                    if *face < floor {
                        return Err(contract_error(axis));
                    }
                } else if c < 0 {
                    let ceiling = next.max()[axis];
                    let face = next.min_corner_mut(axis);
                    *face -= c;
                    if *face > ceiling {
                        return Err(contract_error(axis));
                    }
                }
            }
        }
        *self = next;
        Ok(())
    }

    pub fn shift(&mut self, offset: IVec3) {
        self.pos1 += offset;
        self.pos2 += offset;
    }

    /// Clamp/extend the vertical span to exactly `min_y..=max_y`.
    pub fn set_vertical_range(&mut self, min_y: i32, max_y: i32) {
        if self.pos1.y <= self.pos2.y {
            self.pos1.y = min_y;
            self.pos2.y = max_y;
        } else {
            self.pos2.y = min_y;
            self.pos1.y = max_y;
        }
    }

    /// Corner holding the max value on `axis`. Ties resolve to pos2.
    fn max_corner_mut(&mut self, axis: usize) -> &mut i32 {
        if self.pos1[axis] > self.pos2[axis] {
            &mut self.pos1[axis]
        } else {
            &mut self.pos2[axis]
        }
    }

    /// Corner holding the min value on `axis`. Ties resolve to pos2.
    fn min_corner_mut(&mut self, axis: usize) -> &mut i32 {
        if self.pos1[axis] < self.pos2[axis] {
            &mut self.pos1[axis]
        } else {
            &mut self.pos2[axis]
        }
    }
}

fn contract_error(axis: usize) -> Error {
    let name = ["x", "y", "z"][axis];
    Error::Geometry(format!("Contracting past the opposite face on the {} axis", name))
}
