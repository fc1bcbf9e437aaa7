//! Local key-value persistence holding sets of strings.

use async_trait::async_trait;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Debug,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::error::StoreError;

/// A named-key store where each key maps to a set of strings.
/// Reading a key that was never written yields an empty set.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    async fn read_set(&self, key: &str) -> Result<BTreeSet<String>, StoreError>;

    async fn write_set(&self, key: &str, values: &BTreeSet<String>) -> Result<(), StoreError>;
}

type Document = BTreeMap<String, BTreeSet<String>>;

/// Store backed by one JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Document::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read_set(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        let mut doc = self.load().await?;
        Ok(doc.remove(key).unwrap_or_default())
    }

    async fn write_set(&self, key: &str, values: &BTreeSet<String>) -> Result<(), StoreError> {
        let mut doc = self.load().await?;
        doc.insert(key.to_string(), values.clone());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&doc).map_err(StoreError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), key, count = values.len(), "store written");
        Ok(())
    }
}

/// Volatile store, for tests and sessions that should not persist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key directly, bypassing any encoding done by callers.
    pub fn with_set<I, S>(key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::default();
        store.lock().insert(key.to_string(), values.into_iter().map(Into::into).collect());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Document> {
        self.doc.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read_set(&self, key: &str) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.lock().get(key).cloned().unwrap_or_default())
    }

    async fn write_set(&self, key: &str, values: &BTreeSet<String>) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), values.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn file_store_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));

        assert!(store.read_set("saved_locations").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("favorites.json");

        FileStore::new(&path)
            .write_set("saved_locations", &set(&["a", "b"]))
            .await
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.read_set("saved_locations").await.unwrap(), set(&["a", "b"]));
        assert!(reopened.read_set("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));

        store.write_set("one", &set(&["x"])).await.unwrap();
        store.write_set("two", &set(&["y"])).await.unwrap();

        assert_eq!(store.read_set("one").await.unwrap(), set(&["x"]));
        assert_eq!(store.read_set("two").await.unwrap(), set(&["y"]));
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileStore::new(&path).read_set("saved_locations").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::with_set("k", ["1"]);
        assert_eq!(store.read_set("k").await.unwrap(), set(&["1"]));

        store.write_set("k", &set(&["2", "3"])).await.unwrap();
        assert_eq!(store.read_set("k").await.unwrap(), set(&["2", "3"]));
    }
}
