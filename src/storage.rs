//! Key-value persistence surface.
//!
//! The game only needs `get`/`set`/`remove` on string values. In the browser
//! that is `window.localStorage`; tests use [`MemoryStorage`].

use std::collections::HashMap;

use crate::error::StorageError;

pub trait Storage {
    /// Missing keys and unreadable storage both read as `None`.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    /// When set, every write fails as if the quota were exhausted.
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            values: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "storage is read-only".to_string(),
            });
        }
        self.values.remove(key);
        Ok(())
    }
}

/// `window.localStorage`. Private browsing or a disabled storage leaves the
/// handle empty; reads then return nothing and writes report
/// [`StorageError::Unavailable`].
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if inner.is_none() {
            tracing::warn!("localStorage unavailable; leaderboard will not persist");
        }
        Self { inner }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let store = self.inner.as_ref().ok_or(StorageError::Unavailable)?;
        store.set_item(key, value).map_err(|err| StorageError::Write {
            key: key.to_string(),
            reason: format!("{err:?}"),
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let store = self.inner.as_ref().ok_or(StorageError::Unavailable)?;
        store.remove_item(key).map_err(|err| StorageError::Write {
            key: key.to_string(),
            reason: format!("{err:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let mut s = MemoryStorage::new();
        assert_eq!(s.get("k"), None);
        s.set("k", "v").unwrap();
        assert_eq!(s.get("k").as_deref(), Some("v"));
        s.remove("k").unwrap();
        assert_eq!(s.get("k"), None);
    }

    #[test]
    fn read_only_storage_refuses_writes() {
        let mut s = MemoryStorage::read_only();
        assert!(matches!(s.set("k", "v"), Err(StorageError::Write { .. })));
    }
}
