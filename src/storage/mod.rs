//! Storage Module
//!
//! The synchronous string key-value port the expiring store persists into.

mod memory;

pub use memory::MemoryStorage;

use crate::error::Result;

// == Key-Value Storage Port ==
/// A synchronous, string-keyed persistence layer.
///
/// Implementations only move text around; expiration metadata and
/// serialization live in [`crate::cache::ExpiringStore`].
pub trait KeyValueStorage: Send + Sync {
    /// Returns the raw text stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous text.
    fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
