//! Bounded undo/redo history of completed edit sessions.

use std::collections::VecDeque;

use log::debug;

use crate::core::types::Result;
use crate::edit::{ChangeSet, EditSession};
use crate::world::World;

/// Undo and redo stacks of change sets, each capped at `depth` entries.
///
/// The oldest entry is evicted when a push would exceed the cap.
#[derive(Clone, Debug)]
pub struct EditHistory {
    undo: VecDeque<ChangeSet>,
    redo: VecDeque<ChangeSet>,
    depth: usize,
}

impl EditHistory {
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(depth),
            redo: VecDeque::with_capacity(depth),
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Record a finished session. Empty change sets are ignored; anything
    /// else invalidates the redo stack.
    pub fn remember(&mut self, changes: ChangeSet) {
        if changes.is_empty() {
            return;
        }
        self.redo.clear();
        push_bounded(&mut self.undo, changes, self.depth);
    }

    /// Revert the most recent session. Returns the inverse change set, or
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self, world: &mut dyn World) -> Result<Option<ChangeSet>> {
        let Some(changes) = self.undo.pop_back() else {
            return Ok(None);
        };
        let inverse = revert(&changes, world)?;
        push_bounded(&mut self.redo, inverse.clone(), self.depth);
        Ok(Some(inverse))
    }

    /// Reapply the most recently undone session.
    pub fn redo(&mut self, world: &mut dyn World) -> Result<Option<ChangeSet>> {
        let Some(inverse) = self.redo.pop_back() else {
            return Ok(None);
        };
        let changes = revert(&inverse, world)?;
        push_bounded(&mut self.undo, changes.clone(), self.depth);
        Ok(Some(changes))
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

fn push_bounded(stack: &mut VecDeque<ChangeSet>, changes: ChangeSet, depth: usize) {
    if depth == 0 {
        return;
    }
    stack.push_back(changes);
    while stack.len() > depth {
        if let Some(evicted) = stack.pop_front() {
            debug!("History full, dropped session of {} changes", evicted.len());
        }
    }
}

/// Write every record's `before` back, newest first, through an unlimited
/// and unmasked session.
fn revert(changes: &ChangeSet, world: &mut dyn World) -> Result<ChangeSet> {
    let mut session = EditSession::new(world);
    session.set_blocks_at(changes.iter().rev().map(|r| (r.pos, r.before.clone())))?;
    Ok(session.into_changes())
}
