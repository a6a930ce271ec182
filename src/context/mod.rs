//! Per-user editing state.
//!
//! A [`UserContext`] is created when a user connects and dropped when they
//! leave. Commands borrow it explicitly; nothing here is process-global.

pub mod history;

use std::sync::{Arc, Mutex};

use log::{debug, info};

use crate::block::BlockBag;
use crate::clipboard::Clipboard;
use crate::core::config::EditConfig;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::edit::{ChangeSet, EditSession};
use crate::mask::Mask;
use crate::region::{Region, RegionSelector, SelectorKind};
use crate::world::World;

pub use history::EditHistory;

/// Selection, clipboard, mask, limits and history for one user
#[derive(Debug)]
pub struct UserContext {
    selector: RegionSelector,
    clipboard: Option<Arc<Clipboard>>,
    mask: Option<Mask>,
    fast_mode: bool,
    change_limit: Option<usize>,
    history: EditHistory,
    /// Anchor used by copy and paste
    placement: IVec3,
}

impl UserContext {
    pub fn new(config: &EditConfig) -> Self {
        Self {
            selector: RegionSelector::default(),
            clipboard: None,
            mask: None,
            fast_mode: false,
            change_limit: config.default_change_limit(),
            history: EditHistory::new(config.history_size),
            placement: IVec3::ZERO,
        }
    }

    pub fn selector(&self) -> &RegionSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut RegionSelector {
        &mut self.selector
    }

    /// Switch selector kind, applying the configured polygon vertex limit.
    pub fn set_selector_kind(&mut self, kind: SelectorKind, config: &EditConfig) {
        let kind = match kind {
            SelectorKind::Polygon { .. } => SelectorKind::Polygon {
                max_points: config.polygon_point_limit(),
            },
            other => other,
        };
        self.selector.convert(kind);
    }

    /// The completed selection
    pub fn selection(&self) -> Result<&Region> {
        self.selector.region()
    }

    pub fn clipboard(&self) -> Result<Arc<Clipboard>> {
        self.clipboard
            .clone()
            .ok_or(Error::MissingState("Your clipboard is empty"))
    }

    pub fn set_clipboard(&mut self, clipboard: Clipboard) {
        self.clipboard = Some(Arc::new(clipboard));
    }

    pub fn clear_clipboard(&mut self) {
        self.clipboard = None;
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn set_mask(&mut self, mask: Option<Mask>) {
        self.mask = mask;
    }

    pub fn fast_mode(&self) -> bool {
        self.fast_mode
    }

    pub fn set_fast_mode(&mut self, fast_mode: bool) {
        self.fast_mode = fast_mode;
    }

    pub fn change_limit(&self) -> Option<usize> {
        self.change_limit
    }

    /// Apply a requested change limit (negative = unlimited) under the
    /// configured maximum.
    pub fn set_change_limit(&mut self, config: &EditConfig, requested: i64, unrestricted: bool) -> Result<()> {
        self.change_limit = config.resolve_change_limit(requested, unrestricted)?;
        info!("Change limit set to {:?}", self.change_limit);
        Ok(())
    }

    pub fn placement(&self) -> IVec3 {
        self.placement
    }

    pub fn set_placement(&mut self, placement: IVec3) {
        self.placement = placement;
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Open a session carrying this user's mask, limit and fast mode, and
    /// the configured radius bound.
    pub fn edit_session<'w>(
        &self,
        world: &'w mut dyn World,
        bag: Option<&'w mut dyn BlockBag>,
        config: &EditConfig,
    ) -> EditSession<'w> {
        let session = EditSession::new(world)
            .with_mask(self.mask.clone())
            .with_change_limit(self.change_limit)
            .with_fast_mode(self.fast_mode)
            .with_max_radius(config.radius_limit());
        match bag {
            Some(bag) => session.with_bag(bag),
            None => session,
        }
    }

    /// Close a session into the undo history. Returns its change count.
    pub fn remember(&mut self, session: EditSession<'_>) -> usize {
        let changes = session.into_changes();
        let count = changes.len();
        self.history.remember(changes);
        count
    }

    /// Undo the last session. History replays ignore the mask and limit.
    pub fn undo(&mut self, world: &mut dyn World) -> Result<Option<ChangeSet>> {
        self.history.undo(world)
    }

    pub fn redo(&mut self, world: &mut dyn World) -> Result<Option<ChangeSet>> {
        self.history.redo(world)
    }

    /// Undo another user's last session, holding their context for the
    /// whole replay. `allowed` is the caller's permission check.
    pub fn undo_other(target: &Mutex<UserContext>, allowed: bool, world: &mut dyn World) -> Result<Option<ChangeSet>> {
        Self::with_target(target, allowed, |context| context.undo(world))
    }

    pub fn redo_other(target: &Mutex<UserContext>, allowed: bool, world: &mut dyn World) -> Result<Option<ChangeSet>> {
        Self::with_target(target, allowed, |context| context.redo(world))
    }

    fn with_target<T>(
        target: &Mutex<UserContext>,
        allowed: bool,
        f: impl FnOnce(&mut UserContext) -> Result<T>,
    ) -> Result<T> {
        if !allowed {
            return Err(Error::InvalidInput("permission denied".into()));
        }
        let mut context = target.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut context)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        debug!("History cleared");
    }
}
