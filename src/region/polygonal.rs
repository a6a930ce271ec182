//! Polygonal prism region: a 2D polygon extruded over a y range.

use crate::core::error::Error;
use crate::core::types::{DVec3, IVec2, IVec3, Result};
use crate::math::Aabb;

use super::cylinder::check_vertical;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolygonalRegion {
    points: Vec<IVec2>,
    pub min_y: i32,
    pub max_y: i32,
}

impl PolygonalRegion {
    pub fn new(points: Vec<IVec2>, min_y: i32, max_y: i32) -> Self {
        Self {
            points,
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    /// Vertices in x/z, in insertion order
    pub fn points(&self) -> &[IVec2] {
        &self.points
    }

    pub fn add_point(&mut self, point: IVec2) {
        self.points.push(point);
    }

    /// Widen the y range to include `y`
    pub fn include_y(&mut self, y: i32) {
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    fn footprint(&self) -> (IVec2, IVec2) {
        let mut lo = self.points.first().copied().unwrap_or_default();
        let mut hi = lo;
        for p in &self.points {
            lo = lo.min(*p);
            hi = hi.max(*p);
        }
        (lo, hi)
    }

    pub fn min(&self) -> IVec3 {
        let (lo, _) = self.footprint();
        IVec3::new(lo.x, self.min_y, lo.y)
    }

    pub fn max(&self) -> IVec3 {
        let (_, hi) = self.footprint();
        IVec3::new(hi.x, self.max_y, hi.y)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.min(), self.max())
    }

    /// Point-in-polygon by edge crossings. Vertices and edges count as inside.
    pub fn contains(&self, p: IVec3) -> bool {
        if p.y < self.min_y || p.y > self.max_y || self.points.is_empty() {
            return false;
        }
        let (tx, tz) = (p.x as i64, p.z as i64);
        let mut inside = false;
        let mut prev = self.points[self.points.len() - 1];
        for &cur in &self.points {
            if cur.x as i64 == tx && cur.y as i64 == tz {
                return true;
            }
            let (a, b) = if cur.x > prev.x { (prev, cur) } else { (cur, prev) };
            let (x1, z1, x2, z2) = (a.x as i64, a.y as i64, b.x as i64, b.y as i64);
            if x1 <= tx && tx <= x2 {
                let cross = (tz - z1) * (x2 - x1) - (z2 - z1) * (tx - x1);
                if cross == 0 {
                    if (z1 <= tz) == (tz <= z2) {
                        return true;
                    }
                } else if cross < 0 && x1 != tx {
                    inside = !inside;
                }
            }
            prev = cur;
        }
        inside
    }

    pub fn center(&self) -> DVec3 {
        self.bounds().center()
    }

    pub fn expand(&mut self, changes: &[IVec3]) -> Result<()> {
        let (mut min_y, mut max_y) = (self.min_y, self.max_y);
        for change in changes {
            check_vertical(*change, "expanded")?;
            if change.y > 0 {
                max_y += change.y;
            } else {
                min_y += change.y;
            }
        }
        self.min_y = min_y;
        self.max_y = max_y;
        Ok(())
    }

    pub fn contract(&mut self, changes: &[IVec3]) -> Result<()> {
        let (mut min_y, mut max_y) = (self.min_y, self.max_y);
        for change in changes {
            check_vertical(*change, "contracted")?;
            if change.y > 0 {
                max_y -= change.y;
            } else {
                min_y -= change.y;
            }
            if min_y > max_y {
                return Err(Error::Geometry(
                    "Contracting past the opposite face on the y axis".into(),
                ));
            }
        }
        self.min_y = min_y;
        self.max_y = max_y;
        Ok(())
    }

    pub fn shift(&mut self, offset: IVec3) {
        let flat = IVec2::new(offset.x, offset.z);
        for p in &mut self.points {
            *p += flat;
        }
        self.min_y += offset.y;
        self.max_y += offset.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> PolygonalRegion {
        PolygonalRegion::new(
            vec![IVec2::new(0, 0), IVec2::new(4, 0), IVec2::new(0, 4)],
            0,
            1,
        )
    }

    #[test]
    fn test_bounds() {
        let poly = triangle();
        assert_eq!(poly.min(), IVec3::new(0, 0, 0));
        assert_eq!(poly.max(), IVec3::new(4, 1, 4));
    }

    #[test]
    fn test_contains_edges_and_interior() {
        let poly = triangle();
        assert!(poly.contains(IVec3::new(0, 0, 0)));
        assert!(poly.contains(IVec3::new(2, 0, 0)));
        assert!(poly.contains(IVec3::new(2, 1, 2)));
        assert!(poly.contains(IVec3::new(1, 0, 1)));
        assert!(!poly.contains(IVec3::new(3, 0, 3)));
        assert!(!poly.contains(IVec3::new(1, 2, 1)));
    }

    #[test]
    fn test_square_contains_all_of_box() {
        let square = PolygonalRegion::new(
            vec![IVec2::new(0, 0), IVec2::new(3, 0), IVec2::new(3, 3), IVec2::new(0, 3)],
            0,
            0,
        );
        let inside = square.bounds().iter().filter(|p| square.contains(*p)).count();
        assert_eq!(inside, 16);
    }

    #[test]
    fn test_shift_moves_vertices() {
        let mut poly = triangle();
        poly.shift(IVec3::new(1, 2, 3));
        assert_eq!(poly.points()[1], IVec2::new(5, 3));
        assert_eq!((poly.min_y, poly.max_y), (2, 3));
    }

    #[test]
    fn test_vertical_only() {
        let mut poly = triangle();
        assert!(poly.expand(&[IVec3::new(0, 0, 1)]).is_err());
        poly.expand(&[IVec3::new(0, 3, 0)]).unwrap();
        assert_eq!(poly.max_y, 4);
    }
}
