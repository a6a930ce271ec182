//! Vertical elliptic cylinder region.

use crate::core::error::Error;
use crate::core::types::{DVec2, DVec3, IVec2, IVec3, Result};
use crate::math::Aabb;

/// Elliptic cylinder around a vertical axis through `center`, spanning
/// `min_y..=max_y`. Radii are per horizontal axis (x, z).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderRegion {
    pub center: IVec2,
    pub radius: DVec2,
    pub min_y: i32,
    pub max_y: i32,
}

impl CylinderRegion {
    pub fn new(center: IVec2, radius: DVec2, min_y: i32, max_y: i32) -> Self {
        Self {
            center,
            radius: radius.abs(),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    /// Integer half-extent of the footprint per horizontal axis
    fn extent(&self) -> IVec2 {
        IVec2::new(
            (self.radius.x + 0.5).floor() as i32,
            (self.radius.y + 0.5).floor() as i32,
        )
    }

    pub fn min(&self) -> IVec3 {
        let e = self.extent();
        IVec3::new(self.center.x - e.x, self.min_y, self.center.y - e.y)
    }

    pub fn max(&self) -> IVec3 {
        let e = self.extent();
        IVec3::new(self.center.x + e.x, self.max_y, self.center.y + e.y)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.min(), self.max())
    }

    pub fn contains(&self, p: IVec3) -> bool {
        if p.y < self.min_y || p.y > self.max_y {
            return false;
        }
        let d = (IVec2::new(p.x, p.z) - self.center).as_dvec2() / (self.radius + 0.5);
        d.length_squared() <= 1.0
    }

    pub fn center(&self) -> DVec3 {
        DVec3::new(
            self.center.x as f64,
            (self.min_y + self.max_y) as f64 / 2.0,
            self.center.y as f64,
        )
    }

    pub fn expand(&mut self, changes: &[IVec3]) -> Result<()> {
        let mut next = *self;
        for change in changes {
            check_vertical(*change, "expanded")?;
            if change.y > 0 {
                next.max_y += change.y;
            } else {
                next.min_y += change.y;
            }
        }
        *self = next;
        Ok(())
    }

    pub fn contract(&mut self, changes: &[IVec3]) -> Result<()> {
        let mut next = *self;
        for change in changes {
            check_vertical(*change, "contracted")?;
            if change.y > 0 {
                next.max_y -= change.y;
            } else {
                next.min_y -= change.y;
            }
            if next.min_y > next.max_y {
                return Err(Error::Geometry(
                    "Contracting past the opposite face on the y axis".into(),
                ));
            }
        }
        *self = next;
        Ok(())
    }

    pub fn shift(&mut self, offset: IVec3) {
        self.center += IVec2::new(offset.x, offset.z);
        self.min_y += offset.y;
        self.max_y += offset.y;
    }
}

/// Prism-shaped regions can only change height.
pub(super) fn check_vertical(change: IVec3, verb: &str) -> Result<()> {
    if change.x != 0 || change.z != 0 {
        return Err(Error::Geometry(format!(
            "This region can only be {} vertically",
            verb
        )));
    }
    Ok(())
}
