use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;

use super::error::StorageError;
use super::store::KeyValueStore;

/// A key-value store backed by a single JSON object file.
///
/// The file maps keys to string payloads. A missing file is an empty store.
/// Writes go to a temp file which is then renamed over the original, so a
/// crash mid-write never leaves a truncated store behind.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file and its parent directory are created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(StorageError::Json(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Replacing corrupt store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_owned(), value);
        self.write_entries(&entries).await?;
        tracing::debug!(path = %self.path.display(), key, "Wrote store entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs as std_fs;

    use tempfile::tempdir;

    use super::*;

    fn make_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let (_dir, store) = make_store();
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let (_dir, store) = make_store();
        store.set("key", "value".into()).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("value".into()));
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let (_dir, store) = make_store();
        store.set("key", "first".into()).await.unwrap();
        store.set("key", "second".into()).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("second".into()));
    }

    #[tokio::test]
    async fn set_keeps_other_keys() {
        let (_dir, store) = make_store();
        store.set("a", "1".into()).await.unwrap();
        store.set("b", "2".into()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some("1".into()));
        assert_eq!(store.get("b").await.unwrap(), Some("2".into()));
    }

    #[tokio::test]
    async fn set_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("storage.json"));
        store.set("key", "value".into()).await.unwrap();
        assert!(store.path().is_file());
    }

    #[tokio::test]
    async fn set_leaves_no_temp_file() {
        let (dir, store) = make_store();
        store.set("key", "value".into()).await.unwrap();
        let names: Vec<_> = std_fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["storage.json"]);
    }

    #[tokio::test]
    async fn corrupt_file_fails_reads() {
        let (_dir, store) = make_store();
        std_fs::write(store.path(), "not json").unwrap();
        assert!(matches!(
            store.get("key").await,
            Err(StorageError::Json(_))
        ));
    }

    #[tokio::test]
    async fn corrupt_file_is_replaced_on_write() {
        let (_dir, store) = make_store();
        std_fs::write(store.path(), "not json").unwrap();
        store.set("key", "value".into()).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("value".into()));
    }

    #[tokio::test]
    async fn unreadable_path_is_io_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be cannot be read as text.
        let store = FileStore::new(dir.path());
        assert!(matches!(store.get("key").await, Err(StorageError::Io(_))));
    }
}
