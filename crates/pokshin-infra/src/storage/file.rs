//! File-backed storage - the device-local store used by default.
//!
//! All keys live in one JSON object file. Every write replaces the file
//! atomically (temp file + rename) so a crash never leaves half a record.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pokshin_core::StoreError;
use pokshin_core::ports::KeyValueStore;

pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store file, creating its directory if needed.
    ///
    /// A missing file starts empty. An unreadable file also starts empty and is
    /// replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::Connection(format!("{}: {e}", dir.display())))?;
        }

        let entries = match tokio::fs::read(&path).await {
            Ok(raw) => match serde_json::from_slice(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Store file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StoreError::Connection(format!("{}: {e}", path.display())));
            }
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next).await?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pokshin-file-store-{}-{name}", std::process::id()))
            .join("archive.json")
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = scratch_path("reopen");
        let _ = tokio::fs::remove_file(&path).await;

        let store = FileStore::open(&path).await.unwrap();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.remove("a").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("a").await, None);
        assert_eq!(reopened.get("b").await.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let path = scratch_path("corrupt");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("anything").await, None);

        store.set("k", "v").await.unwrap();
        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.get("k").map(String::as_str), Some("v"));
    }

    #[tokio::test]
    async fn test_non_utf8_file_starts_empty_and_stays_writable() {
        let path = scratch_path("non-utf8");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, [0xFF, 0xFE, 0x00, 0x7B]).await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("pokshin_archive_posts_v1").await, None);

        store.set("pokshin_archive_posts_v1", "[]").await.unwrap();
        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("pokshin_archive_posts_v1").await.as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_remove_missing_key_does_not_write() {
        let path = scratch_path("remove-missing");
        let _ = tokio::fs::remove_file(&path).await;

        let store = FileStore::open(&path).await.unwrap();
        store.remove("nothing").await.unwrap();
        assert!(!path.exists());
    }
}
