//! Transactional block editing.
//!
//! An [`EditSession`] wraps a [`World`](crate::world::World) and funnels
//! every write through one checked path (height, mask, change budget, block
//! bag), recording the net change per position in a [`ChangeSet`] so the
//! whole session can be undone. Operations are grouped by family:
//!
//! - `region_ops`: fills, replacements, walls, move/stack, hollow, analysis
//! - `shapes`: cylinders, spheres, pyramids, formula shapes and deformation
//! - `utility`: terrain, liquid, biome, regeneration and entity helpers
//! - `heightmap`: column heights and the Gaussian filter behind `smooth`

pub mod change;
pub mod session;
pub mod region_ops;
pub mod shapes;
pub mod utility;
pub mod heightmap;

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::block::{BaseBlock, BlockFilter};

pub use change::{ChangeRecord, ChangeSet};
pub use session::EditSession;
pub use shapes::ShapeFrame;

/// Count blocks by type (or by type and data), most common first. Ties sort
/// by id, then data.
pub fn block_distribution<'b, I>(blocks: I, separate_data: bool) -> Vec<(BlockFilter, usize)>
where
    I: IntoIterator<Item = &'b BaseBlock>,
{
    let mut counts: HashMap<BlockFilter, usize> = HashMap::new();
    for block in blocks {
        let key = if separate_data {
            BlockFilter::exact(block.id, block.data)
        } else {
            BlockFilter::any_data(block.id)
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut sorted: Vec<(BlockFilter, usize)> = counts.into_iter().collect();
    sorted.sort_by_key(|(filter, count)| (Reverse(*count), filter.id, filter.data));
    sorted
}
