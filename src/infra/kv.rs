//! The durable key-value backend: a string-keyed, string-valued map holding
//! JSON-encoded documents.
//!
//! Two implementations ship with the crate. [`JsonFileStore`] keeps one JSON
//! file per key under a configured directory and is the production backend;
//! [`MemoryStore`] is volatile and exists for tests and ephemeral embeddings.
//! Callers own serialization; the store never inspects values.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// Errors surfaced by the durable store.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("invalid storage key `{key}`")]
    InvalidKey { key: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A durable string-keyed map with JSON-encoded string values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    async fn put(&self, key: &str, value: String) -> Result<(), KvError>;
    async fn remove(&self, key: &str) -> Result<(), KvError>;
}

/// Keys double as file stems, so restrict them to a portable alphabet.
fn validate_key(key: &str) -> Result<(), KvError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-');
    if valid {
        Ok(())
    } else {
        Err(KvError::InvalidKey {
            key: key.to_string(),
        })
    }
}

/// Filesystem-backed store: one `<key>.json` document per key.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Initialise storage rooted at the provided directory, creating it if
    /// necessary.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, KvError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        validate_key(key)?;
        match fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), KvError> {
        validate_key(key)?;
        // Write-then-rename keeps a crashed write from truncating the
        // previous durable copy.
        let target = self.path_for(key);
        let staging = self.root.join(format!(".{key}.{}.tmp", Uuid::new_v4()));
        fs::write(&staging, value).await?;
        if let Err(err) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        validate_key(key)?;
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Volatile in-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        validate_key(key)?;
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> Result<(), KvError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.get("siteContent").await.unwrap(), None);

        store
            .put("siteContent", "{\"hero\":{}}".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("siteContent").await.unwrap().as_deref(),
            Some("{\"hero\":{}}")
        );

        store.remove("siteContent").await.unwrap();
        assert_eq!(store.get("siteContent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_outside_the_portable_alphabet_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get("../escape").await,
            Err(KvError::InvalidKey { .. })
        ));
        assert!(matches!(
            store.put("", "x".to_string()).await,
            Err(KvError::InvalidKey { .. })
        ));
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::new(dir.path()).unwrap();
            store
                .put("blogPosts", "[]".to_string())
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::new(dir.path()).unwrap();
        assert_eq!(
            reopened.get("blogPosts").await.unwrap().as_deref(),
            Some("[]")
        );
        reopened.remove("blogPosts").await.unwrap();
        // Removing an absent key is a no-op.
        reopened.remove("blogPosts").await.unwrap();
        assert_eq!(reopened.get("blogPosts").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.put("language", "\"he\"".to_string()).await.unwrap();
        store.put("language", "\"en\"".to_string()).await.unwrap();
        assert_eq!(
            store.get("language").await.unwrap().as_deref(),
            Some("\"en\"")
        );
        // No staging files left behind.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
