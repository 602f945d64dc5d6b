//! Registry of live scope stores.

use crate::store::ScopeStore;
use dashmap::DashMap;
use forbiddenblocks_core::{ScopeId, WORLDS_DIR};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// All scope stores opened by this client, keyed by scope id.
///
/// Each scope has at most one live [`ScopeStore`]; concurrent first access
/// from several threads constructs it exactly once.
#[derive(Debug)]
pub struct WorldStores {
    dir: PathBuf,
    stores: DashMap<ScopeId, Arc<ScopeStore>>,
}

impl WorldStores {
    /// Stores kept under `<game_dir>/config/forbiddenblocks/worlds`.
    pub fn new(game_dir: &Path) -> Self {
        Self::with_dir(game_dir.join(WORLDS_DIR))
    }

    /// Stores kept directly in `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stores: DashMap::new(),
        }
    }

    /// Directory holding the scope files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store for `scope`, opening and loading it on first use.
    pub fn open(&self, scope: &ScopeId) -> Arc<ScopeStore> {
        if let Some(store) = self.stores.get(scope) {
            return Arc::clone(store.value());
        }
        let store = self
            .stores
            .entry(scope.clone())
            .or_insert_with(|| Arc::new(ScopeStore::open(scope.clone(), &self.dir)));
        Arc::clone(store.value())
    }

    /// Store for `scope` if it is already open.
    pub fn get(&self, scope: &ScopeId) -> Option<Arc<ScopeStore>> {
        self.stores.get(scope).map(|store| Arc::clone(store.value()))
    }

    /// Number of open stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// True when no store has been opened.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Ids of every open store, sorted.
    pub fn scopes(&self) -> Vec<ScopeId> {
        let mut scopes: Vec<ScopeId> = self.stores.iter().map(|entry| entry.key().clone()).collect();
        scopes.sort();
        scopes
    }

    /// Save every dirty store. Returns how many saves failed.
    pub fn flush_all(&self) -> usize {
        let stores: Vec<Arc<ScopeStore>> = self
            .stores
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        info!("Saving {} scope stores", stores.len());

        let mut failures = 0;
        for store in stores {
            if let Err(err) = store.save() {
                error!("Failed to save {}: {err}", store.scope());
                failures += 1;
            }
        }
        failures
    }

    /// Final flush before exit.
    ///
    /// Open stores stay registered, so handles callers still hold remain the
    /// live instance for their scope.
    pub fn shutdown(&self) -> usize {
        let failures = self.flush_all();
        info!("Scope stores flushed for shutdown ({failures} failed)");
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forbiddenblocks_core::ItemIdentity;
    use tempfile::tempdir;

    #[test]
    fn same_scope_shares_one_store() {
        let dir = tempdir().unwrap();
        let stores = WorldStores::new(dir.path());
        let scope = ScopeId::singleplayer("Alpha");

        let a = stores.open(&scope);
        let b = stores.open(&scope);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(stores.len(), 1);
        assert!(dir
            .path()
            .join(WORLDS_DIR)
            .join("singleplayer_Alpha.json")
            .exists());
    }

    #[test]
    fn scopes_are_isolated() {
        let dir = tempdir().unwrap();
        let stores = WorldStores::new(dir.path());
        let item = ItemIdentity::new("minecraft:tnt", "TNT", "{}");

        let alpha = ScopeId::singleplayer("Alpha");
        let server = ScopeId::multiplayer("example.com:25565");
        stores.open(&alpha).toggle(&item);

        assert!(stores.open(&alpha).is_forbidden(&item));
        assert!(!stores.open(&server).is_forbidden(&item));
        assert_eq!(stores.scopes(), vec![server, alpha]);
    }

    #[test]
    fn concurrent_first_access_builds_one_store() {
        let dir = tempdir().unwrap();
        let stores = Arc::new(WorldStores::new(dir.path()));
        let scope = ScopeId::multiplayer("race.example.com");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stores = Arc::clone(&stores);
                let scope = scope.clone();
                std::thread::spawn(move || stores.open(&scope))
            })
            .collect();
        let opened: Vec<Arc<ScopeStore>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(stores.len(), 1);
        assert!(opened.iter().all(|store| Arc::ptr_eq(store, &opened[0])));
    }

    #[test]
    fn shutdown_keeps_held_stores_live() {
        let dir = tempdir().unwrap();
        let stores = WorldStores::new(dir.path());
        let scope = ScopeId::singleplayer("Alpha");
        let item = ItemIdentity::new("minecraft:dirt", "Dirt", "");
        let held = stores.open(&scope);
        held.toggle(&item);

        assert_eq!(stores.shutdown(), 0);
        assert_eq!(stores.len(), 1);
        assert!(Arc::ptr_eq(&held, &stores.open(&scope)));
        assert!(!held.is_dirty());

        let reopened = WorldStores::new(dir.path());
        assert!(reopened.open(&scope).is_forbidden(&item));
    }

    #[test]
    fn aliasing_world_names_share_one_store() {
        let dir = tempdir().unwrap();
        let stores = WorldStores::new(dir.path());
        let tnt = ItemIdentity::new("minecraft:tnt", "TNT", "{}");
        let dirt = ItemIdentity::new("minecraft:dirt", "Dirt", "{}");

        let colon = stores.open(&ScopeId::singleplayer("A:B"));
        let underscore = stores.open(&ScopeId::singleplayer("A_B"));
        assert!(Arc::ptr_eq(&colon, &underscore));
        assert_eq!(stores.len(), 1);

        colon.toggle(&tnt);
        underscore.toggle(&dirt);

        let reopened = WorldStores::new(dir.path());
        let store = reopened.open(&ScopeId::singleplayer("A:B"));
        assert!(store.is_forbidden(&tnt));
        assert!(store.is_forbidden(&dirt));
    }
}
