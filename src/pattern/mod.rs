//! Patterns: per-position block generators used by fills and shapes.

use std::sync::Arc;

use rand::Rng;

use crate::block::BaseBlock;
use crate::clipboard::Clipboard;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result};

/// One entry of a weighted-random pattern
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedBlock {
    pub block: BaseBlock,
    pub weight: f64,
}

/// Block value generator. All variants answer [`Pattern::next`] for any
/// position; callers may special-case [`Pattern::Single`] via
/// [`Pattern::as_single`].
#[derive(Clone, Debug)]
pub enum Pattern {
    Single(BaseBlock),
    /// Weighted choice, weights need not sum to 1
    Random { entries: Vec<WeightedBlock>, total: f64 },
    /// Tile the clipboard contents across the world
    Clipboard(Arc<Clipboard>),
}

impl Pattern {
    /// Weighted-random pattern. Needs at least one entry with positive weight.
    pub fn random(entries: Vec<(BaseBlock, f64)>) -> Result<Self> {
        let entries: Vec<WeightedBlock> = entries
            .into_iter()
            .filter(|(_, w)| *w > 0.0)
            .map(|(block, weight)| WeightedBlock { block, weight })
            .collect();
        let total: f64 = entries.iter().map(|e| e.weight).sum();
        if entries.is_empty() || !total.is_finite() {
            return Err(Error::InvalidInput(
                "A random pattern needs at least one positive weight".into(),
            ));
        }
        Ok(Pattern::Random { entries, total })
    }

    pub fn clipboard(clipboard: Arc<Clipboard>) -> Self {
        Pattern::Clipboard(clipboard)
    }

    /// Block for a position
    pub fn next(&self, pos: IVec3) -> BaseBlock {
        match self {
            Pattern::Single(block) => block.clone(),
            Pattern::Random { entries, total } => {
                let roll = rand::thread_rng().gen_range(0.0..*total);
                let mut acc = 0.0;
                for entry in entries {
                    acc += entry.weight;
                    if roll < acc {
                        return entry.block.clone();
                    }
                }
                // Rounding left the roll past the last bucket
                entries
                    .last()
                    .map(|e| e.block.clone())
                    .unwrap_or_default()
            }
            Pattern::Clipboard(clipboard) => {
                let local = pos.rem_euclid(clipboard.size());
                clipboard.block_at(local).cloned().unwrap_or_default()
            }
        }
    }

    /// The fixed block, if this pattern always yields the same one
    pub fn as_single(&self) -> Option<&BaseBlock> {
        match self {
            Pattern::Single(block) => Some(block),
            Pattern::Random { entries, .. } if entries.len() == 1 => Some(&entries[0].block),
            _ => None,
        }
    }
}

impl From<BaseBlock> for Pattern {
    fn from(block: BaseBlock) -> Self {
        Pattern::Single(block)
    }
}
