//! # Session Storage
//!
//! Key/value persistence behind the session store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SessionStore ──► dyn SessionStorage                                    │
//! │                     ├── MemoryStorage  (tests, one-shot processes)     │
//! │                     └── FileStorage    (one JSON object on disk)       │
//! │                                                                         │
//! │  Keys: token, username, fullName, roles, userId, shopId, shopName       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Storage keys, matching what earlier clients wrote.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USERNAME: &str = "username";
    pub const FULL_NAME: &str = "fullName";
    pub const ROLES: &str = "roles";
    pub const USER_ID: &str = "userId";
    pub const SHOP_ID: &str = "shopId";
    pub const SHOP_NAME: &str = "shopName";
}

/// One staged write: `Some` sets the key, `None` removes it.
pub type Change<'a> = (&'a str, Option<&'a str>);

/// String key/value storage. Implementations must be safe to share.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;

    /// Applies every change or none of them.
    ///
    /// The default goes key by key; implementations that can fail part way
    /// override it.
    fn apply(&self, changes: &[Change<'_>]) -> ClientResult<()> {
        for (key, value) in changes {
            match value {
                Some(v) => self.set(key, v)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }
}

fn stage(entries: &mut BTreeMap<String, String>, changes: &[Change<'_>]) {
    for (key, value) in changes {
        match value {
            Some(v) => {
                entries.insert(key.to_string(), v.to_string());
            }
            None => {
                entries.remove(*key);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Memory Storage
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        lock(&self.entries).clear();
        Ok(())
    }

    fn apply(&self, changes: &[Change<'_>]) -> ClientResult<()> {
        stage(&mut lock(&self.entries), changes);
        Ok(())
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// A JSON object on disk, rewritten in full on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens `path`. A missing file is an empty session; an unreadable or
    /// corrupt one is logged and treated as empty too.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(?path, error = %e, "Session file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "No session file yet");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(?path, error = %e, "Cannot read session file, starting empty");
                BTreeMap::new()
            }
        };

        FileStorage {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::StorageFailed(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Changes a copy, writes it, and only then replaces the cached map, so
    /// a failed write leaves memory matching disk.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> ClientResult<()> {
        let mut entries = lock(&self.entries);
        let mut staged = entries.clone();
        change(&mut staged);
        self.persist(&staged)?;
        *entries = staged;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> ClientResult<()> {
        self.update(BTreeMap::clear)
    }

    fn apply(&self, changes: &[Change<'_>]) -> ClientResult<()> {
        self.update(|entries| stage(entries, changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "abc").unwrap();
        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("abc"));

        storage.remove(keys::TOKEN).unwrap();
        assert_eq!(storage.get(keys::TOKEN), None);

        storage.set(keys::USERNAME, "jdoe").unwrap();
        storage.clear().unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get(keys::TOKEN), None);
        storage.set(keys::TOKEN, "abc").unwrap();
        storage.set(keys::ROLES, r#"["ROLE_CASHIER"]"#).unwrap();

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get(keys::TOKEN).as_deref(), Some("abc"));
        assert_eq!(reopened.get(keys::ROLES).as_deref(), Some(r#"["ROLE_CASHIER"]"#));

        reopened.clear().unwrap();
        assert_eq!(FileStorage::open(&path).get(keys::TOKEN), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get(keys::TOKEN), None);
        storage.set(keys::TOKEN, "fresh").unwrap();
        assert_eq!(FileStorage::open(&path).get(keys::TOKEN).as_deref(), Some("fresh"));
    }

    /// Swaps the session file for a directory so the next write fails.
    fn break_file(path: &Path) {
        std::fs::remove_file(path).unwrap();
        std::fs::create_dir(path).unwrap();
    }

    #[test]
    fn test_failed_write_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileStorage::open(&path);
        storage.set(keys::TOKEN, "abc").unwrap();
        break_file(&path);

        assert!(storage.set(keys::TOKEN, "new").is_err());
        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("abc"));
        assert!(storage.clear().is_err());
        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("abc"));
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileStorage::open(&path);
        storage
            .apply(&[(keys::TOKEN, Some("abc")), (keys::SHOP_ID, Some("2"))])
            .unwrap();
        assert_eq!(FileStorage::open(&path).get(keys::SHOP_ID).as_deref(), Some("2"));

        storage
            .apply(&[(keys::TOKEN, Some("def")), (keys::SHOP_ID, None)])
            .unwrap();
        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get(keys::TOKEN).as_deref(), Some("def"));
        assert_eq!(reopened.get(keys::SHOP_ID), None);

        break_file(&path);
        assert!(storage
            .apply(&[(keys::TOKEN, Some("ghi")), (keys::SHOP_ID, Some("3"))])
            .is_err());
        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("def"));
        assert_eq!(storage.get(keys::SHOP_ID), None);
    }
}
