//! Column height maps and the Gaussian filter used to smooth them.

use crate::block::id;
use crate::core::types::{IVec2, IVec3};
use crate::region::Region;

use super::session::EditSession;

/// Square, normalized Gaussian weights over `(2 * radius + 1)^2` cells.
#[derive(Clone, Debug)]
pub struct GaussianKernel {
    radius: i32,
    weights: Vec<f64>,
}

impl GaussianKernel {
    pub fn new(radius: u32, sigma: f64) -> Self {
        let radius = radius as i32;
        let side = (2 * radius + 1) as usize;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let mut weights = Vec::with_capacity(side * side);
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                weights.push((-((dx * dx + dz * dz) as f64) / two_sigma_sq).exp());
            }
        }
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Self { radius, weights }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    fn weight(&self, dx: i32, dz: i32) -> f64 {
        let side = 2 * self.radius + 1;
        self.weights[((dz + self.radius) * side + dx + self.radius) as usize]
    }
}

/// Highest solid block per column over a region's bounding box.
///
/// Heights are absolute y values. A column with nothing in it sits at the
/// box floor.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    min: IVec2,
    width: i32,
    length: i32,
    floor: i32,
    heights: Vec<i32>,
}

impl HeightMap {
    /// Scan each column top-down. With `natural_only`, only natural terrain
    /// counts as ground.
    pub fn sample(session: &EditSession, region: &Region, natural_only: bool) -> Self {
        let (min, max) = (region.min(), region.max());
        let width = max.x - min.x + 1;
        let length = max.z - min.z + 1;
        let mut heights = Vec::with_capacity((width * length) as usize);
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                let top = (min.y..=max.y).rev().find(|&y| {
                    let block = session.block(IVec3::new(x, y, z));
                    if natural_only {
                        id::is_natural_terrain(block.id)
                    } else {
                        !block.is_air()
                    }
                });
                heights.push(top.unwrap_or(min.y));
            }
        }
        Self {
            min: IVec2::new(min.x, min.z),
            width,
            length,
            floor: min.y,
            heights,
        }
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    /// Height of a column, `None` outside the map.
    pub fn height(&self, column: IVec2) -> Option<i32> {
        let local = column - self.min;
        if local.x < 0 || local.y < 0 || local.x >= self.width || local.y >= self.length {
            return None;
        }
        Some(self.heights[(local.y * self.width + local.x) as usize])
    }

    /// Run the kernel over the map `iterations` times, rounding to whole
    /// blocks after each pass. Samples past the edge clamp to the border.
    pub fn filtered(&self, kernel: &GaussianKernel, iterations: u32) -> Self {
        let mut current = self.heights.clone();
        let r = kernel.radius();
        for _ in 0..iterations {
            let mut next = Vec::with_capacity(current.len());
            for z in 0..self.length {
                for x in 0..self.width {
                    let mut sum = 0.0;
                    for dz in -r..=r {
                        let sz = (z + dz).clamp(0, self.length - 1);
                        for dx in -r..=r {
                            let sx = (x + dx).clamp(0, self.width - 1);
                            sum += kernel.weight(dx, dz) * current[(sz * self.width + sx) as usize] as f64;
                        }
                    }
                    next.push((sum + 0.5).floor() as i32);
                }
            }
            current = next;
        }
        Self { heights: current, ..self.clone() }
    }
}
