//! Block-grid math utilities

pub mod aabb;

pub use aabb::{Aabb, AabbIter};
