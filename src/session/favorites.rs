//! The persisted favorites list.

use super::store::KeyValueStore;

/// Storage key holding the JSON array of favorite texts.
pub const FAVORITES_KEY: &str = "favorites";

/// Ordered favorite texts, without exact duplicates.
///
/// Loaded once from the store at construction; every mutation rewrites the
/// whole list. Storage failures are logged and never surface to the caller.
pub struct FavoritesList {
    entries: Vec<String>,
    store: Box<dyn KeyValueStore>,
}

impl FavoritesList {
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                log::warn!("favorites: stored value is not a string list ({e}); starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("favorites: failed to read store: {e}");
                Vec::new()
            }
        };
        log::debug!("favorites: loaded {} entries", entries.len());
        Self { entries, store }
    }

    /// Append `text` unless it is empty or already present.
    ///
    /// Returns whether the list changed.
    pub fn add(&mut self, text: &str) -> bool {
        if text.is_empty() || self.contains(text) {
            return false;
        }
        self.entries.push(text.to_string());
        self.persist();
        true
    }

    /// Remove the entry at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.entries.len() {
            log::warn!(
                "favorites: remove({index}) out of range (len {})",
                self.entries.len()
            );
            return None;
        }
        let removed = self.entries.remove(index);
        self.persist();
        Some(removed)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e == text)
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("favorites: failed to serialise: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(FAVORITES_KEY, &raw) {
            log::warn!("favorites: failed to persist: {e}");
        }
    }
}

impl std::fmt::Debug for FavoritesList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesList")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{MemoryStore, StoreError};

    fn stored(store: &MemoryStore) -> Option<Vec<String>> {
        store
            .get(FAVORITES_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn absent_value_loads_empty() {
        let favs = FavoritesList::load(Box::new(MemoryStore::new()));
        assert!(favs.is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{not json").unwrap();
        let favs = FavoritesList::load(Box::new(store));
        assert!(favs.is_empty());
    }

    #[test]
    fn existing_value_is_loaded_in_order() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, r#"["one","two"]"#).unwrap();
        let favs = FavoritesList::load(Box::new(store));
        assert_eq!(favs.entries(), ["one", "two"]);
    }

    #[test]
    fn add_rejects_empty_and_duplicates() {
        let store = MemoryStore::new();
        let mut favs = FavoritesList::load(Box::new(store.clone()));

        assert!(!favs.add(""));
        assert!(stored(&store).is_none());

        assert!(favs.add("dil"));
        assert!(!favs.add("dil"));
        assert!(favs.add("Dil"));
        assert_eq!(favs.entries(), ["dil", "Dil"]);
        assert_eq!(stored(&store).unwrap(), ["dil", "Dil"]);
    }

    #[test]
    fn remove_rewrites_the_list() {
        let store = MemoryStore::new();
        let mut favs = FavoritesList::load(Box::new(store.clone()));
        favs.add("a");
        favs.add("b");
        favs.add("c");

        assert_eq!(favs.remove(1).as_deref(), Some("b"));
        assert_eq!(stored(&store).unwrap(), ["a", "c"]);

        assert!(favs.remove(5).is_none());
        assert_eq!(favs.len(), 2);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Poisoned)
        }
        fn set(&mut self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[test]
    fn storage_failures_keep_the_in_memory_list() {
        let mut favs = FavoritesList::load(Box::new(FailingStore));
        assert!(favs.add("x"));
        assert!(favs.contains("x"));
    }
}
