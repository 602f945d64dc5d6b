//! Forbidden list of a single world or server.

use crate::persist::{self, PersistError};
use forbiddenblocks_core::{ItemIdentity, ScopeId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct StoreState {
    forbidden: HashSet<ItemIdentity>,
    dirty: bool,
}

/// Persistent set of forbidden items for one scope.
///
/// The set and its dirty flag live behind one lock, and saves happen while
/// holding it, so a toggle and a save can never interleave.
#[derive(Debug)]
pub struct ScopeStore {
    scope: ScopeId,
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl ScopeStore {
    /// Open the store for `scope` inside `dir`, loading it from disk.
    ///
    /// A missing file is created empty straight away.
    pub fn open(scope: ScopeId, dir: &Path) -> Self {
        let path = dir.join(format!("{}.json", scope.file_stem()));
        debug!("Scope {scope} uses {}", path.display());
        let store = Self {
            scope,
            path,
            state: Mutex::new(StoreState::default()),
        };
        store.load();
        store
    }

    /// Scope this store belongs to.
    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `identity` is forbidden in this scope.
    pub fn is_forbidden(&self, identity: &ItemIdentity) -> bool {
        let forbidden = self.state.lock().forbidden.contains(identity);
        debug!("Checked {identity} in {}: forbidden={forbidden}", self.scope);
        forbidden
    }

    /// Flip membership of `identity` and persist right away.
    ///
    /// Returns whether the item is forbidden afterwards. A failed save is
    /// logged and leaves the store dirty for the next attempt.
    pub fn toggle(&self, identity: &ItemIdentity) -> bool {
        let mut state = self.state.lock();
        let now_forbidden = if state.forbidden.remove(identity) {
            info!("Allowed {identity} again in {}", self.scope);
            false
        } else {
            state.forbidden.insert(identity.clone());
            info!("Forbade {identity} in {}", self.scope);
            true
        };
        state.dirty = true;

        if let Err(err) = self.save_locked(&mut state) {
            error!("Failed to save {} after toggle: {err}", self.scope);
        }
        now_forbidden
    }

    /// Write the set to disk if it has unsaved changes.
    pub fn save(&self) -> Result<(), PersistError> {
        let mut state = self.state.lock();
        self.save_locked(&mut state)
    }

    /// Re-read the backing file.
    ///
    /// Unsaved changes win over the file: a dirty store is saved instead.
    pub fn reload(&self) {
        let mut state = self.state.lock();
        if state.dirty {
            warn!(
                "Scope {} has unsaved changes, saving instead of reloading",
                self.scope
            );
            if let Err(err) = self.save_locked(&mut state) {
                error!("Failed to save {}: {err}", self.scope);
            }
            return;
        }
        self.load_locked(&mut state);
    }

    /// Whether the in-memory set differs from the last successful write.
    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// Number of forbidden items.
    pub fn len(&self) -> usize {
        self.state.lock().forbidden.len()
    }

    /// True when nothing is forbidden.
    pub fn is_empty(&self) -> bool {
        self.state.lock().forbidden.is_empty()
    }

    /// Sorted copy of the forbidden items.
    pub fn items(&self) -> Vec<ItemIdentity> {
        let mut items: Vec<ItemIdentity> = self.state.lock().forbidden.iter().cloned().collect();
        items.sort();
        items
    }

    fn load(&self) {
        let mut state = self.state.lock();
        self.load_locked(&mut state);
    }

    fn load_locked(&self, state: &mut StoreState) {
        if !self.path.exists() {
            info!(
                "No forbidden list for {} yet, creating {}",
                self.scope,
                self.path.display()
            );
            state.dirty = true;
            if let Err(err) = self.save_locked(state) {
                error!("Failed to create {}: {err}", self.path.display());
            }
            return;
        }

        match persist::read_items(&self.path) {
            Ok(items) => {
                info!("Loaded {} forbidden items for {}", items.len(), self.scope);
                state.forbidden = items;
            }
            Err(err) => {
                error!(
                    "Failed to load {} from {}: {err}",
                    self.scope,
                    self.path.display()
                );
            }
        }
    }

    fn save_locked(&self, state: &mut StoreState) -> Result<(), PersistError> {
        if !state.dirty {
            debug!("Scope {} is clean, nothing to save", self.scope);
            return Ok(());
        }
        persist::write_items(&self.path, &state.forbidden)?;
        state.dirty = false;
        info!(
            "Saved {} forbidden items for {} to {}",
            state.forbidden.len(),
            self.scope,
            self.path.display()
        );
        Ok(())
    }
}
