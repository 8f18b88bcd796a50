//! Durable key-value storage and the saved theme selection.

use crate::common::errors::StoreError;
use crate::model::{DEFAULT_THEME, ThemeCatalog};
use async_trait::async_trait;

pub mod file_store;
pub mod legacy;
pub mod memory_store;

pub use file_store::FileStore;
pub use legacy::{DEFAULT_LEGACY_STYLESHEET, LEGACY_THEME_KEY, LegacyStylesheetSwitcher};
pub use memory_store::MemoryStore;

/// Key under which the selected theme id is kept.
pub const THEME_STORAGE_KEY: &str = "forum-theme";

/// A per-origin string store that survives page reloads.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<'a, K: KeyValueStore + ?Sized> KeyValueStore for &'a K {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}

/// Reads and writes the last selected theme.
#[derive(Debug)]
pub struct ThemePreferences<K: KeyValueStore> {
    store: K,
    key: String,
}

impl<K: KeyValueStore> ThemePreferences<K> {
    pub fn new(store: K, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// The saved theme id, if it names a theme in `catalog`.
    ///
    /// Store failures are logged and read as "nothing saved".
    pub async fn load(&self, catalog: &ThemeCatalog) -> Option<String> {
        let saved = match self.store.get(&self.key).await {
            Ok(saved) => saved?,
            Err(e) => {
                log::warn!("Failed to read saved theme: {e}");
                return None;
            }
        };

        if catalog.contains(&saved) {
            Some(saved)
        } else {
            log::info!("Saved theme \"{saved}\" is not available, ignoring it");
            None
        }
    }

    /// The saved theme, or [`DEFAULT_THEME`].
    pub async fn resolve(&self, catalog: &ThemeCatalog) -> String {
        self.load(catalog)
            .await
            .unwrap_or_else(|| DEFAULT_THEME.to_string())
    }

    pub async fn save(&self, theme_id: &str) -> Result<(), StoreError> {
        self.store.set(&self.key, theme_id).await?;
        log::debug!("Saved theme selection \"{theme_id}\"");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ThemeDescriptor;
    use claims::{assert_none, assert_ok, assert_some_eq};

    fn catalog(ids: &[&str]) -> ThemeCatalog {
        ids.iter()
            .map(|id| ThemeDescriptor::new(id, "themes"))
            .collect()
    }

    #[tokio::test]
    async fn test_load_requires_catalog_membership() {
        let store = MemoryStore::new();
        let preferences = ThemePreferences::new(&store, THEME_STORAGE_KEY);
        assert_none!(preferences.load(&catalog(&["cyrodiil"])).await);

        assert_ok!(preferences.save("cyrodiil").await);
        assert_some_eq!(preferences.load(&catalog(&["cyrodiil"])).await, "cyrodiil");
        assert_none!(preferences.load(&catalog(&["clean_old"])).await);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_default() {
        let store = MemoryStore::new().with_value(THEME_STORAGE_KEY, "removed_theme");
        let preferences = ThemePreferences::new(store, THEME_STORAGE_KEY);
        assert_eq!(
            preferences.resolve(&catalog(&["clean_old"])).await,
            DEFAULT_THEME
        );
    }

    #[tokio::test]
    async fn test_failing_store_reads_as_absent() {
        let store = MemoryStore::new().failing();
        let preferences = ThemePreferences::new(store, THEME_STORAGE_KEY);
        assert_eq!(
            preferences.resolve(&catalog(&["clean_old"])).await,
            DEFAULT_THEME
        );
        assert!(preferences.save("clean_old").await.is_err());
    }
}
