use super::KeyValueStore;
use crate::common::errors::StoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

const APP_DIR: &str = "forumstyle";
const STORAGE_DIR: &str = "storage";

/// One JSON object per origin on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers never see a half-written file. Writes of one store
/// are serialized.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store for `origin` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, origin: &str) -> Self {
        let file_name = format!("{}.json", origin_slug(origin));
        Self {
            path: dir.as_ref().join(file_name),
            write_lock: Mutex::new(()),
        }
    }

    /// Store for `origin` under `<config_dir>/forumstyle/storage`.
    pub fn for_origin(origin: &str) -> Result<Self, StoreError> {
        let dir = default_storage_dir().ok_or_else(|| {
            StoreError::Unavailable("Unable to determine config directory".to_string())
        })?;
        Ok(Self::new(dir, origin))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let content = serde_json::to_vec_pretty(values).map_err(|e| StoreError::Corrupted {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content)
            .await
            .map_err(|e| self.io_error(e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values).await
    }
}

pub fn default_storage_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(STORAGE_DIR))
}

/// File-name-safe form of an origin: `https://a.github.io` becomes
/// `https%3A%2F%2Fa.github.io`.
fn origin_slug(origin: &str) -> String {
    let origin = origin.trim_end_matches('/');
    if origin.is_empty() {
        return "local".to_string();
    }
    urlencoding::encode(origin).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_matches, assert_none, assert_ok, assert_some_eq};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_survive_a_new_instance() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path(), "https://alexkolmar.github.io");
        assert_none!(store.get("forum-theme").await.unwrap());
        assert_ok!(store.set("forum-theme", "cyrodiil").await);
        assert_ok!(store.set("demo-forum-theme", "style2.css").await);

        let reopened = FileStore::new(dir.path(), "https://alexkolmar.github.io/");
        assert_some_eq!(reopened.get("forum-theme").await.unwrap(), "cyrodiil");
        assert_ok!(reopened.set("forum-theme", "clean_old").await);
        assert_some_eq!(store.get("forum-theme").await.unwrap(), "clean_old");
        assert_some_eq!(store.get("demo-forum-theme").await.unwrap(), "style2.css");
    }

    #[tokio::test]
    async fn test_origins_are_isolated() {
        let dir = TempDir::new().unwrap();
        let a = FileStore::new(dir.path(), "https://a.example");
        let b = FileStore::new(dir.path(), "https://b.example");
        assert_ok!(a.set("forum-theme", "clean_old").await);
        assert_none!(b.get("forum-theme").await.unwrap());
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"), "origin");
        assert_ok!(store.set("k", "v").await);
        let names: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["origin.json"]);
    }

    #[tokio::test]
    async fn test_concurrent_writes_keep_every_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path(), "origin");
        let (first, second) = tokio::join!(
            store.set("forum-theme", "cyrodiil"),
            store.set("demo-forum-theme", "style2.css")
        );
        assert_ok!(first);
        assert_ok!(second);

        assert_some_eq!(store.get("forum-theme").await.unwrap(), "cyrodiil");
        assert_some_eq!(store.get("demo-forum-theme").await.unwrap(), "style2.css");
    }

    #[tokio::test]
    async fn test_corrupted_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path(), "origin");
        std::fs::write(store.path(), "not json").unwrap();
        assert_matches!(store.get("k").await, Err(StoreError::Corrupted { .. }));
    }

    #[test]
    fn test_origin_slug() {
        assert_eq!(origin_slug(""), "local");
        assert_eq!(origin_slug("https://a.io/"), "https%3A%2F%2Fa.io");
    }
}
