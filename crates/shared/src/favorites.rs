use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::error::FavoritesError;

/// Durable key shared by every engine instance.
pub const FAVORITES_KEY: &str = "spotlight:favorites";

/// Key/value backend for the favorite set (browser local storage in the app).
pub trait FavoriteStore {
    fn read(&self, key: &str) -> Result<Option<String>, FavoritesError>;
    fn write(&self, key: &str, value: &str) -> Result<(), FavoritesError>;
}

/// In-memory store. Clones share the same map, like two tabs over one storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoriteStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl FavoriteStore for MemoryFavoriteStore {
    fn read(&self, key: &str) -> Result<Option<String>, FavoritesError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), FavoritesError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: BTreeSet<String>,
}

impl FavoriteSet {
    /// Load from the store. Missing or corrupt data yields an empty set.
    pub fn load(store: &dyn FavoriteStore) -> Self {
        match Self::try_load(store) {
            Ok(set) => set,
            Err(err) => {
                tracing::debug!(%err, "favorites: starting empty");
                FavoriteSet::default()
            }
        }
    }

    fn try_load(store: &dyn FavoriteStore) -> Result<Self, FavoritesError> {
        let Some(raw) = store.read(FAVORITES_KEY)? else {
            return Ok(FavoriteSet::default());
        };
        let ids: Vec<String> = serde_json::from_str(&raw)?;
        Ok(FavoriteSet {
            ids: ids.into_iter().collect(),
        })
    }

    pub fn save(&self, store: &dyn FavoriteStore) -> Result<(), FavoritesError> {
        let ids: Vec<&String> = self.ids.iter().collect();
        let json = serde_json::to_string(&ids)?;
        store.write(FAVORITES_KEY, &json)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership. Returns whether the id is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
