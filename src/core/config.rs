//! Editing limits loaded from the host's configuration.
//!
//! The core only reads these values. Negative numbers mean "no limit",
//! matching the on-disk convention.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Error;
use super::types::Result;

/// Numeric limits applied to edit sessions and selections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Change limit a new user context starts with (-1 = unlimited).
    pub default_change_limit: i64,
    /// Highest change limit a restricted user may request (-1 = no cap).
    pub max_change_limit: i64,
    /// Largest radius accepted by radius-based operations (-1 = no cap).
    pub max_radius: i32,
    /// Radius used by butcher when the caller gives none.
    pub butcher_default_radius: i32,
    /// Upper bound for butcher radius (-1 = no cap).
    pub butcher_max_radius: i32,
    /// Polygon vertex limit a new selector starts with (-1 = unlimited).
    pub default_max_polygon_points: i32,
    /// Hard cap on polygon vertices (-1 = no cap).
    pub max_polygon_points: i32,
    /// Number of edit sessions kept per user for undo.
    pub history_size: usize,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            default_change_limit: -1,
            max_change_limit: -1,
            max_radius: -1,
            butcher_default_radius: -1,
            butcher_max_radius: -1,
            default_max_polygon_points: -1,
            max_polygon_points: 20,
            history_size: 15,
        }
    }
}

impl EditConfig {
    /// Load from a JSON file (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Save to a JSON file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Maximum radius as an option (None = unbounded).
    pub fn radius_limit(&self) -> Option<f64> {
        (self.max_radius >= 0).then_some(self.max_radius as f64)
    }

    /// Pre-flight check for radius-based operations.
    pub fn check_radius(&self, radius: f64) -> Result<()> {
        check_radius(self.radius_limit(), radius)
    }

    /// Change limit new user contexts start with.
    pub fn default_change_limit(&self) -> Option<usize> {
        to_limit(self.default_change_limit)
    }

    /// Validate a requested change limit.
    ///
    /// `requested` below zero means unlimited. Unrestricted users bypass the
    /// configured maximum.
    pub fn resolve_change_limit(&self, requested: i64, unrestricted: bool) -> Result<Option<usize>> {
        let requested = requested.max(-1);
        if !unrestricted && self.max_change_limit > -1 {
            if requested < 0 || requested > self.max_change_limit {
                return Err(Error::LimitExceeded {
                    what: "change limit",
                    requested: requested as f64,
                    max: self.max_change_limit as f64,
                });
            }
        }
        Ok(to_limit(requested))
    }

    /// Resolve the butcher radius: default when absent, clamped to the max.
    pub fn clamp_butcher_radius(&self, requested: Option<i32>) -> i32 {
        let radius = requested.unwrap_or(self.butcher_default_radius);
        if self.butcher_max_radius < 0 {
            return radius;
        }
        if radius < 0 {
            self.butcher_max_radius
        } else {
            radius.min(self.butcher_max_radius)
        }
    }

    /// Polygon vertex limit for new polygon selectors.
    pub fn polygon_point_limit(&self) -> Option<usize> {
        match (self.default_max_polygon_points, self.max_polygon_points) {
            (d, m) if d < 0 && m < 0 => None,
            (d, m) if d < 0 => Some(m as usize),
            (d, m) if m < 0 => Some(d as usize),
            (d, m) => Some(d.min(m) as usize),
        }
    }
}

/// Radius check shared with edit sessions that carry a copied bound.
/// NaN and infinite radii never pass, bounded or not.
pub(crate) fn check_radius(limit: Option<f64>, radius: f64) -> Result<()> {
    if !radius.is_finite() {
        return Err(Error::LimitExceeded {
            what: "radius",
            requested: radius,
            max: limit.unwrap_or(f64::MAX),
        });
    }
    match limit {
        Some(max) if radius > max => Err(Error::LimitExceeded {
            what: "radius",
            requested: radius,
            max,
        }),
        _ => Ok(()),
    }
}

fn to_limit(value: i64) -> Option<usize> {
    (value >= 0).then_some(value as usize)
}
