//! User Store
//!
//! Username -> [`UserRecord`] persistence behind the [`UserStore`] trait.
//! [`JsonFileStore`] keeps the whole mapping in one JSON file that is loaded
//! and rewritten in full on each access.

use crate::error::AuthError;
use crate::models::UserRecord;

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::{Mutex, RwLock};

/// Persistence contract for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a record by exact username
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, AuthError>;

    /// Insert or overwrite a record, keyed by its username
    async fn put(&self, record: UserRecord) -> Result<(), AuthError>;

    /// Check whether a username is registered
    async fn exists(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.get(username).await?.is_some())
    }
}

// ============================================
// JSON File Store
// ============================================

type UserMap = BTreeMap<String, UserRecord>;

/// Whole-file JSON user store
///
/// File layout: `{"<username>": {"username": "...", "hashed_password": "..."}}`.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, creating an empty mapping if the file is missing or empty
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };

        let users = {
            let _guard = store.lock.lock().await;
            store.load().await?
        };

        tracing::info!(
            path = %store.path.display(),
            users = users.len(),
            "User store opened"
        );

        Ok(store)
    }

    /// Read the whole mapping. Caller must hold `self.lock`.
    async fn load(&self) -> Result<UserMap, AuthError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            let users = UserMap::new();
            self.save(&users).await?;
            return Ok(users);
        }

        let raw: UserMap = serde_json::from_str(&content)?;
        Ok(discard_mismatched(raw))
    }

    /// Rewrite the whole mapping. Caller must hold `self.lock`.
    async fn save(&self, users: &UserMap) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(users)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;
        Ok(users.remove(username))
    }

    async fn put(&self, record: UserRecord) -> Result<(), AuthError> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;
        users.insert(record.username.clone(), record);
        self.save(&users).await
    }
}

fn discard_mismatched(raw: UserMap) -> UserMap {
    raw.into_iter()
        .filter(|(key, record)| {
            let consistent = *key == record.username;
            if !consistent {
                tracing::warn!(
                    key = %key,
                    username = %record.username,
                    "Discarding user record stored under a mismatched key"
                );
            }
            consistent
        })
        .collect()
}

// ============================================
// In-Memory Store
// ============================================

/// Process-local user store
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn put(&self, record: UserRecord) -> Result<(), AuthError> {
        self.users
            .write()
            .await
            .insert(record.username.clone(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(username: &str) -> UserRecord {
        UserRecord {
            username: username.to_string(),
            hashed_password: format!("hash-of-{username}"),
        }
    }

    #[tokio::test]
    async fn test_open_initializes_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.json");

        let store = JsonFileStore::open(&path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "{}");
        assert!(!store.exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_open_initializes_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.json");
        std::fs::write(&path, "").unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "{}");
        assert!(store.get("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path().join("users.json"))
            .await
            .unwrap();

        store.put(record("alice")).await.unwrap();

        assert_eq!(store.get("alice").await.unwrap(), Some(record("alice")));
        assert!(store.exists("alice").await.unwrap());
        assert!(!store.exists("Alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.json");

        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store.put(record("alice")).await.unwrap();
            store.put(record("bob")).await.unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert!(reopened.exists("alice").await.unwrap());
        assert!(reopened.exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_file_layout_matches_mapping() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        store.put(record("alice")).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["alice"]["username"], "alice");
        assert_eq!(value["alice"]["hashed_password"], "hash-of-alice");
    }

    #[tokio::test]
    async fn test_memory_store_counts_records() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        store.put(record("alice")).await.unwrap();
        store.put(record("bob")).await.unwrap();

        assert!(!store.is_empty().await);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put(record("alice")).await.unwrap();

        let replacement = UserRecord {
            username: "alice".to_string(),
            hashed_password: "new-hash".to_string(),
        };
        store.put(replacement.clone()).await.unwrap();

        assert_eq!(store.get("alice").await.unwrap(), Some(replacement));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_mismatched_entries_discarded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.json");
        std::fs::write(
            &path,
            r#"{"alice": {"username": "mallory", "hashed_password": "x"},
                "bob": {"username": "bob", "hashed_password": "y"}}"#,
        )
        .unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();

        assert!(store.get("alice").await.unwrap().is_none());
        assert!(store.get("bob").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_unavailable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.json");
        std::fs::write(&path, "not json").unwrap();

        let result = JsonFileStore::open(&path).await;
        assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));
    }
}
