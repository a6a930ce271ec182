//! Ellipsoid (and sphere) region.

use crate::core::error::Error;
use crate::core::types::{DVec3, IVec3, Result};
use crate::math::Aabb;

/// Ellipsoid with per-axis radii. A sphere has equal radii.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipsoidRegion {
    pub center: IVec3,
    pub radius: DVec3,
}

impl EllipsoidRegion {
    pub fn new(center: IVec3, radius: DVec3) -> Self {
        Self { center, radius: radius.abs() }
    }

    pub fn sphere(center: IVec3, radius: f64) -> Self {
        Self::new(center, DVec3::splat(radius))
    }

    fn extent(&self) -> IVec3 {
        (self.radius + 0.5).floor().as_ivec3()
    }

    pub fn min(&self) -> IVec3 {
        self.center - self.extent()
    }

    pub fn max(&self) -> IVec3 {
        self.center + self.extent()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.min(), self.max())
    }

    pub fn contains(&self, p: IVec3) -> bool {
        let d = (p - self.center).as_dvec3() / (self.radius + 0.5);
        d.length_squared() <= 1.0
    }

    /// Radii grow by half the total change per axis. Each axis must receive
    /// equal positive and negative amounts.
    pub fn expand(&mut self, changes: &[IVec3]) -> Result<()> {
        let grow = symmetric_total(changes, "expanded")?;
        self.radius += grow.as_dvec3() / 2.0;
        Ok(())
    }

    pub fn contract(&mut self, changes: &[IVec3]) -> Result<()> {
        let shrink = symmetric_total(changes, "contracted")?;
        let radius = self.radius - shrink.as_dvec3() / 2.0;
        if radius.min_element() < 0.0 {
            return Err(Error::Geometry("Contracting past the ellipsoid center".into()));
        }
        self.radius = radius;
        Ok(())
    }

    pub fn shift(&mut self, offset: IVec3) {
        self.center += offset;
    }
}

fn symmetric_total(changes: &[IVec3], verb: &str) -> Result<IVec3> {
    let mut net = IVec3::ZERO;
    let mut total = IVec3::ZERO;
    for change in changes {
        net += *change;
        total += change.abs();
    }
    if net != IVec3::ZERO {
        return Err(Error::Geometry(format!(
            "Ellipsoids must be {} evenly in each dimension",
            verb
        )));
    }
    Ok(total)
}
