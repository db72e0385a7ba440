//! Local snapshot persistence for autosave drafts.
//!
//! Snapshots are whole JSON value sets keyed by a caller-chosen string. No
//! versioning, expiry or locking: a second form using the same key simply
//! overwrites the first.

use gloo_storage::{LocalStorage, Storage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::forms::FormValues;
use crate::services::errors::StorageError;

pub trait SnapshotStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn read_snapshot(&self, key: &str) -> Result<Option<FormValues>, StorageError>;
    fn write_snapshot(&self, key: &str, values: &FormValues) -> Result<(), StorageError>;
    fn remove_snapshot(&self, key: &str);
}

/// Browser LocalStorage via gloo-storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

impl SnapshotStore for LocalStorageStore {
    fn read_snapshot(&self, key: &str) -> Result<Option<FormValues>, StorageError> {
        match LocalStorage::get::<FormValues>(key) {
            Ok(values) => Ok(Some(values)),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_snapshot(&self, key: &str, values: &FormValues) -> Result<(), StorageError> {
        LocalStorage::set(key, values).map_err(|e| match e {
            gloo_storage::errors::StorageError::JsError(js) if is_quota_error(&js.name) => {
                StorageError::Quota {
                    key: key.to_string(),
                }
            }
            other => other.into(),
        })
    }

    fn remove_snapshot(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// DOMException names browsers use for a full LocalStorage.
fn is_quota_error(name: &str) -> bool {
    matches!(name, "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED")
}

/// In-memory store holding raw JSON text, so unreadable snapshots can be
/// represented too.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(self, key: impl Into<String>, raw: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.into(), raw.into());
        self
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl SnapshotStore for MemoryStore {
    fn read_snapshot(&self, key: &str) -> Result<Option<FormValues>, StorageError> {
        match self.entries.borrow().get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn write_snapshot(&self, key: &str, values: &FormValues) -> Result<(), StorageError> {
        let raw = serde_json::to_string(values)?;
        self.entries.borrow_mut().insert(key.to_string(), raw);
        Ok(())
    }

    fn remove_snapshot(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Shared store handle for component props.
#[derive(Clone)]
pub struct SnapshotStoreRef(Rc<dyn SnapshotStore>);

impl SnapshotStoreRef {
    pub fn new(store: impl SnapshotStore + 'static) -> Self {
        Self(Rc::new(store))
    }

    /// LocalStorage in the browser, memory elsewhere.
    pub fn platform_default() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::new(LocalStorageStore)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::new(MemoryStore::new())
        }
    }
}

impl SnapshotStore for SnapshotStoreRef {
    fn read_snapshot(&self, key: &str) -> Result<Option<FormValues>, StorageError> {
        self.0.read_snapshot(key)
    }

    fn write_snapshot(&self, key: &str, values: &FormValues) -> Result<(), StorageError> {
        self.0.write_snapshot(key, values)
    }

    fn remove_snapshot(&self, key: &str) {
        self.0.remove_snapshot(key)
    }
}

impl PartialEq for SnapshotStoreRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SnapshotStoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SnapshotStoreRef(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_round_trips_whole_snapshot() {
        let store = MemoryStore::new();
        let mut values = FormValues::new();
        values.insert("name".into(), json!("Alice"));
        store.write_snapshot("draft-1", &values).unwrap();

        assert_eq!(store.raw("draft-1").as_deref(), Some(r#"{"name":"Alice"}"#));
        assert_eq!(store.read_snapshot("draft-1").unwrap(), Some(values));

        store.remove_snapshot("draft-1");
        assert_eq!(store.read_snapshot("draft-1").unwrap(), None);
    }

    #[test]
    fn test_memory_store_reports_unparseable_snapshot() {
        let store = MemoryStore::new().with_raw("draft-2", "{not json");
        assert!(matches!(
            store.read_snapshot("draft-2"),
            Err(StorageError::Serialization { .. })
        ));
    }

    #[test]
    fn test_only_quota_exceptions_count_as_quota() {
        assert!(is_quota_error("QuotaExceededError"));
        assert!(is_quota_error("NS_ERROR_DOM_QUOTA_REACHED"));
        assert!(!is_quota_error("SecurityError"));
        assert!(!is_quota_error(""));

        let missing = gloo_storage::errors::StorageError::KeyNotFound("draft-3".into());
        assert!(matches!(
            StorageError::from(missing),
            StorageError::Unavailable { .. }
        ));
    }
}
