//! Voxedit - transactional bulk block editing for voxel worlds

pub mod core;
pub mod math;
pub mod block;
pub mod world;
pub mod region;
pub mod pattern;
pub mod mask;
pub mod expression;
pub mod edit;
pub mod clipboard;
pub mod context;
