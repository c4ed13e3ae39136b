//! # Session Store
//!
//! The one place the authenticated session lives. Written at login, cleared
//! wholesale at logout or when the backend answers 401.
//!
//! ## Thread Safety
//! The cached session sits behind a `std::sync::Mutex`. Every method takes
//! the lock, copies or replaces the session, and releases it before
//! returning, so no caller ever holds it across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard};

use tillpoint_core::{RoleSet, Session};
use tracing::{info, warn};

use crate::error::ClientResult;
use crate::storage::{keys, SessionStorage};

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: Mutex<Session>,
}

impl SessionStore {
    /// Wraps `storage`, reading whatever session it already holds.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let current = read_session(storage.as_ref());
        SessionStore {
            storage,
            current: Mutex::new(current),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Replaces the session and writes every field to storage in one batch.
    /// Absent shop fields are removed so a previous user's shop never leaks
    /// through. If the write fails, neither storage nor the cached session
    /// changes.
    pub fn begin(&self, session: Session) -> ClientResult<()> {
        let roles = serde_json::to_string(&session.roles)?;
        let user_id = session.user_id.map(|id| id.to_string());
        let shop_id = session.shop_id.map(|id| id.to_string());

        self.storage.apply(&[
            (keys::TOKEN, session.token.as_deref()),
            (keys::USERNAME, session.username.as_deref()),
            (keys::FULL_NAME, session.full_name.as_deref()),
            (keys::ROLES, Some(roles.as_str())),
            (keys::USER_ID, user_id.as_deref()),
            (keys::SHOP_ID, shop_id.as_deref()),
            (keys::SHOP_NAME, session.shop_name.as_deref()),
        ])?;

        info!(
            username = session.username.as_deref().unwrap_or(""),
            roles = %session.roles.labels(),
            shop_id = ?session.shop_id,
            "Session started"
        );
        *self.lock() = session;
        Ok(())
    }

    /// Drops the whole session. The in-memory copy is cleared even when the
    /// storage write fails.
    pub fn clear(&self) -> ClientResult<()> {
        *self.lock() = Session::default();
        let result = self.storage.clear();
        if let Err(e) = &result {
            warn!(error = %e, "Failed to clear session storage");
        }
        info!("Session cleared");
        result
    }
}

fn read_session(storage: &dyn SessionStorage) -> Session {
    let roles = storage
        .get(keys::ROLES)
        .map(|raw| {
            serde_json::from_str::<RoleSet>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored roles are unreadable, treating as none");
                RoleSet::new()
            })
        })
        .unwrap_or_default();

    Session {
        token: storage.get(keys::TOKEN),
        username: storage.get(keys::USERNAME),
        full_name: storage.get(keys::FULL_NAME),
        roles,
        user_id: storage.get(keys::USER_ID).and_then(|v| v.parse().ok()),
        shop_id: storage.get(keys::SHOP_ID).and_then(|v| v.parse().ok()),
        shop_name: storage.get(keys::SHOP_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use tillpoint_core::Role;

    fn cashier() -> Session {
        Session {
            token: Some("tok".into()),
            username: Some("cash1".into()),
            full_name: Some("Cash One".into()),
            roles: ["ROLE_CASHIER"].into_iter().collect(),
            user_id: Some(9),
            shop_id: Some(2),
            shop_name: Some("Main".into()),
        }
    }

    #[test]
    fn test_begin_writes_storage_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.begin(cashier()).unwrap();

        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("tok"));
        assert_eq!(storage.get(keys::ROLES).as_deref(), Some(r#"["ROLE_CASHIER"]"#));
        assert_eq!(storage.get(keys::USER_ID).as_deref(), Some("9"));
        assert_eq!(storage.get(keys::SHOP_ID).as_deref(), Some("2"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_new_session_without_shop_removes_old_shop() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.begin(cashier()).unwrap();

        let admin = Session {
            token: Some("tok2".into()),
            roles: ["ROLE_ADMIN"].into_iter().collect(),
            ..Session::default()
        };
        store.begin(admin).unwrap();

        assert_eq!(storage.get(keys::SHOP_ID), None);
        assert_eq!(storage.get(keys::SHOP_NAME), None);
        assert!(store.snapshot().roles.contains(&Role::Admin));
    }

    #[test]
    fn test_restores_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        SessionStore::new(storage.clone()).begin(cashier()).unwrap();

        let restored = SessionStore::new(storage);
        assert_eq!(restored.snapshot(), cashier());
    }

    #[test]
    fn test_unreadable_roles_mean_no_roles() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, "tok").unwrap();
        storage.set(keys::ROLES, "ROLE_ADMIN").unwrap();

        let store = SessionStore::new(storage);
        assert!(store.is_authenticated());
        assert!(store.snapshot().roles.is_empty());
    }

    #[test]
    fn test_failed_begin_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let storage = Arc::new(FileStorage::open(&path));
        let store = SessionStore::new(storage.clone());
        store.begin(cashier()).unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        let admin = Session {
            token: Some("tok2".into()),
            username: Some("boss".into()),
            roles: ["ROLE_ADMIN"].into_iter().collect(),
            ..Session::default()
        };

        assert!(store.begin(admin).is_err());
        assert_eq!(store.snapshot(), cashier());
        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("tok"));
        assert_eq!(storage.get(keys::USERNAME).as_deref(), Some("cash1"));
        assert_eq!(storage.get(keys::SHOP_ID).as_deref(), Some("2"));
    }

    #[test]
    fn test_clear() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.begin(cashier()).unwrap();
        store.clear().unwrap();

        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
        assert_eq!(store.token(), None);
    }
}
