//! Per-plugin persistent data

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::warn;

use crate::application::errors::StorageError;
use crate::domain::traits::Store;

/// Storage key of a plugin's data blob
pub fn data_key(plugin: &str) -> String {
    format!("plugin_data/{}", plugin)
}

/// Handle on the data blob one plugin keeps in storage.
///
/// Handed out by [`Plugin::data`](super::trait_def::Plugin::data) while the
/// plugin is being declared, so handlers can capture a clone. The store is
/// attached when the plugin is loaded; until then every operation fails
/// with [`StorageError::Unavailable`].
#[derive(Clone)]
pub struct PluginData {
    key: String,
    store: Arc<OnceCell<Arc<dyn Store>>>,
}

impl PluginData {
    pub(crate) fn new(plugin: &str) -> Self {
        Self {
            key: data_key(plugin),
            store: Arc::new(OnceCell::new()),
        }
    }

    /// Storage key this handle reads and writes
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether a store has been attached
    pub fn is_attached(&self) -> bool {
        self.store.get().is_some()
    }

    pub(crate) fn attach(&self, store: Arc<dyn Store>) {
        if self.store.set(store).is_err() {
            warn!("Data of '{}' is already attached to a store, keeping it", self.key);
        }
    }

    fn store(&self) -> Result<&Arc<dyn Store>, StorageError> {
        self.store
            .get()
            .ok_or_else(|| StorageError::Unavailable(self.key.clone()))
    }

    /// Current blob, `None` if nothing was stored yet
    pub async fn read(&self) -> Result<Option<String>, StorageError> {
        self.store()?.get(&self.key).await
    }

    /// Replace the blob
    pub async fn write(&self, data: &str) -> Result<(), StorageError> {
        self.store()?.set(&self.key, data).await
    }

    /// Remove the blob
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store()?.delete(&self.key).await
    }
}

impl fmt::Debug for PluginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginData")
            .field("key", &self.key)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::JsonStore;

    #[tokio::test]
    async fn test_detached_handle_fails() {
        let data = PluginData::new("dates");

        assert_eq!(data.key(), "plugin_data/dates");
        assert!(!data.is_attached());
        assert!(matches!(data.read().await, Err(StorageError::Unavailable(_))));
        assert!(matches!(data.write("x").await, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_clones_share_the_attached_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("store.json")).await.unwrap();

        let data = PluginData::new("dates");
        let captured = data.clone();
        data.attach(Arc::new(store));

        captured.write("{\"bob\":1}").await.unwrap();
        assert_eq!(data.read().await.unwrap().as_deref(), Some("{\"bob\":1}"));

        data.clear().await.unwrap();
        assert_eq!(captured.read().await.unwrap(), None);
    }
}
