//! Interactive region builder driven by primary/secondary point picks.

use log::trace;

use crate::core::error::Error;
use crate::core::types::{DVec2, DVec3, IVec2, IVec3, Result};

use super::{fmt_pos, CuboidRegion, CylinderRegion, EllipsoidRegion, PolygonalRegion, Region};

/// How picks are turned into a region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorKind {
    /// Two opposite corners
    Cuboid,
    /// Primary starts a one-block box, secondary grows it to include the pick
    Extending,
    /// Vertices of a 2D polygon; the y range covers every pick
    Polygon { max_points: Option<usize> },
    /// Center, then per-axis radii
    Ellipsoid,
    /// Center, then a uniform radius
    Sphere,
    /// Center, then horizontal radii and y range
    Cylinder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    PrimarySet,
    Complete,
}

/// Selection state machine. Owns the region once enough points are picked.
#[derive(Clone, Debug)]
pub struct RegionSelector {
    kind: SelectorKind,
    primary: Option<IVec3>,
    secondary: Option<IVec3>,
    /// Most recent secondary pick, for feedback
    last_pick: Option<IVec3>,
    region: Option<Region>,
}

fn flat(p: IVec3) -> IVec2 {
    IVec2::new(p.x, p.z)
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new(SelectorKind::Cuboid)
    }
}

impl RegionSelector {
    pub fn new(kind: SelectorKind) -> Self {
        Self {
            kind,
            primary: None,
            secondary: None,
            last_pick: None,
            region: None,
        }
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    pub fn primary(&self) -> Option<IVec3> {
        self.primary
    }

    pub fn secondary(&self) -> Option<IVec3> {
        self.secondary
    }

    pub fn state(&self) -> SelectionState {
        if self.is_complete() {
            SelectionState::Complete
        } else if self.primary.is_some() || self.secondary.is_some() {
            SelectionState::PrimarySet
        } else {
            SelectionState::Empty
        }
    }

    pub fn is_complete(&self) -> bool {
        match (&self.kind, &self.region) {
            (_, None) => false,
            (SelectorKind::Cuboid, _) => self.primary.is_some() && self.secondary.is_some(),
            (SelectorKind::Extending, _) => true,
            (SelectorKind::Polygon { .. }, Some(Region::Polygonal(p))) => p.points().len() >= 3,
            (SelectorKind::Polygon { .. }, Some(_)) => true,
            _ => self.secondary.is_some(),
        }
    }

    /// Pick the primary point. Returns false if it was already the primary.
    pub fn select_primary(&mut self, pos: IVec3) -> bool {
        match self.kind {
            SelectorKind::Cuboid => {
                if self.primary == Some(pos) {
                    return false;
                }
                self.region = self.secondary.map(|b| Region::cuboid(pos, b));
            }
            SelectorKind::Extending => {
                if self.primary == Some(pos) && self.secondary == Some(pos) {
                    return false;
                }
                self.secondary = Some(pos);
                self.region = Some(Region::cuboid(pos, pos));
            }
            SelectorKind::Polygon { .. } => {
                if let Some(Region::Polygonal(p)) = &self.region {
                    if p.points() == [flat(pos)].as_slice() && p.min_y == pos.y && p.max_y == pos.y {
                        return false;
                    }
                }
                self.secondary = None;
                self.region = Some(Region::Polygonal(PolygonalRegion::new(
                    vec![flat(pos)],
                    pos.y,
                    pos.y,
                )));
            }
            SelectorKind::Ellipsoid | SelectorKind::Sphere => {
                if self.primary == Some(pos) && self.secondary.is_none() {
                    return false;
                }
                self.secondary = None;
                self.region = Some(Region::Ellipsoid(EllipsoidRegion::sphere(pos, 0.0)));
            }
            SelectorKind::Cylinder => {
                if self.primary == Some(pos) && self.secondary.is_none() {
                    return false;
                }
                self.secondary = None;
                self.region = Some(Region::Cylinder(CylinderRegion::new(
                    flat(pos),
                    DVec2::ZERO,
                    pos.y,
                    pos.y,
                )));
            }
        }
        self.primary = Some(pos);
        self.last_pick = None;
        trace!("Primary selection ({:?}) at {:?}", self.kind, pos);
        true
    }

    /// Pick the secondary point. Returns false if the pick changes nothing or
    /// a center-based selection has no center yet.
    pub fn select_secondary(&mut self, pos: IVec3) -> bool {
        match self.kind {
            SelectorKind::Cuboid => {
                if self.secondary == Some(pos) {
                    return false;
                }
                self.region = self.primary.map(|a| Region::cuboid(a, pos));
                self.secondary = Some(pos);
            }
            SelectorKind::Extending => {
                let Some(Region::Cuboid(c)) = &mut self.region else {
                    return self.select_primary(pos);
                };
                if c.contains(pos) {
                    return false;
                }
                let (min, max) = (c.min().min(pos), c.max().max(pos));
                *c = CuboidRegion::new(min, max);
                self.primary = Some(min);
                self.secondary = Some(max);
            }
            SelectorKind::Polygon { max_points } => {
                let Some(Region::Polygonal(p)) = &mut self.region else {
                    return self.select_primary(pos);
                };
                if p.points().last() == Some(&flat(pos)) && p.min_y <= pos.y && pos.y <= p.max_y {
                    return false;
                }
                if max_points.is_some_and(|max| p.points().len() >= max) {
                    return false;
                }
                p.add_point(flat(pos));
                p.include_y(pos.y);
                self.secondary = Some(pos);
            }
            SelectorKind::Ellipsoid => {
                let Some(Region::Ellipsoid(e)) = &mut self.region else {
                    return false;
                };
                if self.secondary == Some(pos) {
                    return false;
                }
                let diff = (pos - e.center).abs().as_dvec3();
                e.radius = e.radius.max(diff);
                self.secondary = Some(pos);
            }
            SelectorKind::Sphere => {
                let Some(Region::Ellipsoid(e)) = &mut self.region else {
                    return false;
                };
                if self.secondary == Some(pos) {
                    return false;
                }
                let r = (pos - e.center).as_dvec3().length().ceil();
                e.radius = DVec3::splat(r);
                self.secondary = Some(pos);
            }
            SelectorKind::Cylinder => {
                let Some(Region::Cylinder(c)) = &mut self.region else {
                    return false;
                };
                if self.secondary == Some(pos) {
                    return false;
                }
                let diff = (flat(pos) - c.center).abs().as_dvec2();
                c.radius = c.radius.max(diff);
                c.min_y = c.min_y.min(pos.y);
                c.max_y = c.max_y.max(pos.y);
                self.secondary = Some(pos);
            }
        }
        self.last_pick = Some(pos);
        trace!("Secondary selection ({:?}) at {:?}", self.kind, pos);
        true
    }

    /// The selected region, once complete
    pub fn region(&self) -> Result<&Region> {
        match &self.region {
            Some(region) if self.is_complete() => Ok(region),
            _ => Err(Error::MissingState("Make a region selection first")),
        }
    }

    /// Mutable access for expand/contract/shift. Call
    /// [`learn_changes`](Self::learn_changes) afterwards.
    pub fn region_mut(&mut self) -> Result<&mut Region> {
        if !self.is_complete() {
            return Err(Error::MissingState("Make a region selection first"));
        }
        self.region
            .as_mut()
            .ok_or(Error::MissingState("Make a region selection first"))
    }

    /// Resync the anchor points with the region after direct mutation.
    pub fn learn_changes(&mut self) {
        match &self.region {
            Some(Region::Cuboid(c)) => {
                self.primary = Some(c.pos1());
                self.secondary = Some(c.pos2());
            }
            Some(Region::Ellipsoid(e)) => self.primary = Some(e.center),
            Some(Region::Cylinder(c)) => {
                self.primary = Some(IVec3::new(c.center.x, c.min_y, c.center.y));
            }
            Some(Region::Polygonal(p)) => {
                if let Some(first) = p.points().first() {
                    self.primary = Some(IVec3::new(first.x, p.min_y, first.y));
                }
            }
            None => {}
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.kind);
    }

    /// Switch to another kind, keeping the current bounding box if the
    /// selection is complete.
    pub fn convert(&mut self, kind: SelectorKind) {
        let bounds = self.region().ok().map(|r| (r.min(), r.max()));
        *self = Self::new(kind);
        let Some((min, max)) = bounds else {
            return;
        };
        let center = (min + max).div_euclid(IVec3::splat(2));
        match kind {
            SelectorKind::Cuboid | SelectorKind::Extending => {
                self.primary = Some(min);
                self.secondary = Some(max);
                self.region = Some(Region::cuboid(min, max));
            }
            SelectorKind::Polygon { .. } => {
                let points = vec![
                    IVec2::new(min.x, min.z),
                    IVec2::new(max.x, min.z),
                    IVec2::new(max.x, max.z),
                    IVec2::new(min.x, max.z),
                ];
                self.primary = Some(min);
                self.secondary = Some(max);
                self.region = Some(Region::Polygonal(PolygonalRegion::new(points, min.y, max.y)));
            }
            SelectorKind::Ellipsoid | SelectorKind::Sphere => {
                let mut radius = (max - center).as_dvec3();
                if kind == SelectorKind::Sphere {
                    radius = DVec3::splat(radius.max_element());
                }
                self.primary = Some(center);
                self.secondary = Some(max);
                self.region = Some(Region::Ellipsoid(EllipsoidRegion::new(center, radius)));
            }
            SelectorKind::Cylinder => {
                let radius = (flat(max) - flat(center)).as_dvec2();
                self.primary = Some(IVec3::new(center.x, min.y, center.z));
                self.secondary = Some(max);
                self.region = Some(Region::Cylinder(CylinderRegion::new(
                    flat(center),
                    radius,
                    min.y,
                    max.y,
                )));
            }
        }
    }

    fn area_suffix(&self) -> String {
        match self.region() {
            Ok(region) => format!(" ({})", region.area()),
            Err(_) => String::new(),
        }
    }

    pub fn explain_primary(&self) -> String {
        let Some(pos) = self.primary else {
            return "No primary position set".to_string();
        };
        match self.kind {
            SelectorKind::Cuboid => {
                format!("First position set to {}{}", fmt_pos(pos), self.area_suffix())
            }
            SelectorKind::Extending => {
                format!("Started selection at {}{}", fmt_pos(pos), self.area_suffix())
            }
            SelectorKind::Polygon { .. } => format!("Starting a new polygon at {}", fmt_pos(pos)),
            SelectorKind::Ellipsoid | SelectorKind::Sphere => {
                format!("Center position set to {}", fmt_pos(pos))
            }
            SelectorKind::Cylinder => {
                format!("Starting a new cylindrical selection at {}", fmt_pos(pos))
            }
        }
    }

    pub fn explain_secondary(&self) -> String {
        let area = self.area_suffix();
        match (&self.kind, &self.region) {
            (SelectorKind::Cuboid, _) => match self.secondary {
                Some(pos) => format!("Second position set to {}{}", fmt_pos(pos), area),
                None => "No secondary position set".to_string(),
            },
            (SelectorKind::Extending, _) => match self.last_pick {
                Some(pos) => format!("Extended selection to encompass {}{}", fmt_pos(pos), area),
                None => "Selection not extended".to_string(),
            },
            (SelectorKind::Polygon { .. }, Some(Region::Polygonal(p))) => {
                let last = p.points().last().copied().unwrap_or_default();
                format!(
                    "Added point #{} at ({}, {}){}",
                    p.points().len(),
                    last.x,
                    last.y,
                    area
                )
            }
            (SelectorKind::Sphere, Some(Region::Ellipsoid(e))) => {
                format!("Radius set to {:.1}{}", e.radius.x, area)
            }
            (SelectorKind::Ellipsoid, Some(Region::Ellipsoid(e))) => format!(
                "Radius set to {:.1}/{:.1}/{:.1}{}",
                e.radius.x, e.radius.y, e.radius.z, area
            ),
            (SelectorKind::Cylinder, Some(Region::Cylinder(c))) => format!(
                "Radius set to {:.1}/{:.1} blocks{}",
                c.radius.x, c.radius.y, area
            ),
            _ => "No secondary position set".to_string(),
        }
    }

    /// Feedback after the region was adjusted directly.
    pub fn explain_region_adjust(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.primary.is_some() {
            lines.push(self.explain_primary());
        }
        if self.secondary.is_some() {
            lines.push(self.explain_secondary());
        }
        lines
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            SelectorKind::Cuboid => "cuboid",
            SelectorKind::Extending => "cuboid (extending)",
            SelectorKind::Polygon { .. } => "2D polygon",
            SelectorKind::Ellipsoid => "ellipsoid",
            SelectorKind::Sphere => "sphere",
            SelectorKind::Cylinder => "cylinder",
        }
    }

    pub fn info_lines(&self) -> Vec<String> {
        if let Ok(region) = self.region() {
            return region.info_lines();
        }
        let mut lines = Vec::new();
        if let Some(p) = self.primary {
            lines.push(format!("Primary: {}", fmt_pos(p)));
        }
        if let Some(p) = self.secondary {
            lines.push(format!("Secondary: {}", fmt_pos(p)));
        }
        if let Some(Region::Polygonal(p)) = &self.region {
            lines.push(format!("# points: {}", p.points().len()));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_selection() {
        let mut sel = RegionSelector::new(SelectorKind::Cuboid);
        assert_eq!(sel.state(), SelectionState::Empty);
        assert!(sel.region().is_err());

        assert!(sel.select_primary(IVec3::ZERO));
        assert_eq!(sel.state(), SelectionState::PrimarySet);
        assert!(sel.select_secondary(IVec3::splat(5)));
        assert_eq!(sel.state(), SelectionState::Complete);

        let region = sel.region().unwrap();
        assert_eq!(region.min(), IVec3::ZERO);
        assert_eq!(region.max(), IVec3::splat(5));
        assert_eq!(region.area(), 216);
    }

    #[test]
    fn test_same_pick_twice_returns_false() {
        let mut sel = RegionSelector::new(SelectorKind::Cuboid);
        assert!(sel.select_primary(IVec3::ONE));
        assert!(!sel.select_primary(IVec3::ONE));
        assert!(sel.select_secondary(IVec3::ZERO));
        assert!(!sel.select_secondary(IVec3::ZERO));

        sel.clear();
        assert_eq!(sel.state(), SelectionState::Empty);
        assert!(sel.select_primary(IVec3::ONE));
    }

    #[test]
    fn test_extending_grows() {
        let mut sel = RegionSelector::new(SelectorKind::Extending);
        assert!(sel.select_primary(IVec3::ZERO));
        assert_eq!(sel.region().unwrap().area(), 1);
        assert!(sel.select_secondary(IVec3::new(2, 0, 0)));
        assert!(sel.select_secondary(IVec3::new(0, 0, -1)));
        assert!(!sel.select_secondary(IVec3::new(1, 0, 0)));

        let region = sel.region().unwrap();
        assert_eq!(region.min(), IVec3::new(0, 0, -1));
        assert_eq!(region.max(), IVec3::new(2, 0, 0));
    }

    #[test]
    fn test_polygon_needs_three_points() {
        let mut sel = RegionSelector::new(SelectorKind::Polygon { max_points: Some(3) });
        sel.select_primary(IVec3::new(0, 10, 0));
        sel.select_secondary(IVec3::new(4, 12, 0));
        assert_eq!(sel.state(), SelectionState::PrimarySet);
        assert!(sel.select_secondary(IVec3::new(0, 11, 4)));
        assert_eq!(sel.state(), SelectionState::Complete);
        // Limit reached
        assert!(!sel.select_secondary(IVec3::new(9, 11, 9)));

        let region = sel.region().unwrap();
        assert_eq!(region.min().y, 10);
        assert_eq!(region.max().y, 12);
    }

    #[test]
    fn test_sphere_radius_from_distance() {
        let mut sel = RegionSelector::new(SelectorKind::Sphere);
        assert!(!sel.select_secondary(IVec3::ONE));
        sel.select_primary(IVec3::new(0, 64, 0));
        sel.select_secondary(IVec3::new(3, 65, 0));
        match sel.region().unwrap() {
            Region::Ellipsoid(e) => assert_eq!(e.radius, DVec3::splat(4.0)),
            other => panic!("unexpected region {:?}", other),
        }
    }

    #[test]
    fn test_cylinder_selection() {
        let mut sel = RegionSelector::new(SelectorKind::Cylinder);
        sel.select_primary(IVec3::new(0, 5, 0));
        sel.select_secondary(IVec3::new(3, 9, -2));
        let region = sel.region().unwrap();
        assert_eq!(region.min(), IVec3::new(-3, 5, -2));
        assert_eq!(region.max(), IVec3::new(3, 9, 2));
    }

    #[test]
    fn test_learn_changes_resyncs_anchors() {
        let mut sel = RegionSelector::new(SelectorKind::Cuboid);
        sel.select_primary(IVec3::ZERO);
        sel.select_secondary(IVec3::splat(3));
        sel.region_mut().unwrap().shift(IVec3::new(10, 0, 0));

        // Stale until resynced
        assert_eq!(sel.primary(), Some(IVec3::ZERO));
        sel.learn_changes();
        assert_eq!(sel.primary(), Some(IVec3::new(10, 0, 0)));
        assert_eq!(sel.secondary(), Some(IVec3::new(13, 3, 3)));
        assert_eq!(sel.explain_primary(), "First position set to (10, 0, 0) (64)");
    }

    #[test]
    fn test_convert_keeps_bounds() {
        let mut sel = RegionSelector::new(SelectorKind::Cuboid);
        sel.select_primary(IVec3::ZERO);
        sel.select_secondary(IVec3::new(4, 2, 4));
        sel.convert(SelectorKind::Polygon { max_points: None });
        let region = sel.region().unwrap();
        assert_eq!(region.min(), IVec3::ZERO);
        assert_eq!(region.max(), IVec3::new(4, 2, 4));
        assert_eq!(region.area(), 75);
    }

    #[test]
    fn test_explain() {
        let mut sel = RegionSelector::new(SelectorKind::Cuboid);
        sel.select_primary(IVec3::new(1, 2, 3));
        assert_eq!(sel.explain_primary(), "First position set to (1, 2, 3)");
        sel.select_secondary(IVec3::new(1, 2, 4));
        assert_eq!(sel.explain_secondary(), "Second position set to (1, 2, 4) (2)");
        assert_eq!(sel.explain_region_adjust().len(), 2);
    }
}
