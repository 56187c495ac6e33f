//! In-Memory Storage
//!
//! HashMap-backed implementation of the storage port.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{CacheError, Result};
use crate::storage::KeyValueStorage;

// == Memory Storage ==
/// Keeps raw entries in a `HashMap` behind a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    // == Constructor ==
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of raw entries, expired ones included.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Keys ==
    /// Returns all stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .items
            .read()
            .map(|items| items.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| CacheError::Storage("storage lock poisoned".to_string()))?;
        items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| CacheError::Storage("storage lock poisoned".to_string()))?;
        items.remove(key);
        Ok(())
    }
}
