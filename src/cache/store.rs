//! Expiring Store Module
//!
//! Wraps a key-value storage port with expiration metadata and staleness checks.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::error::Result;
use crate::storage::KeyValueStorage;

// == Expiring Store ==
/// Key-value cache with per-entry expiration on top of a [`KeyValueStorage`].
///
/// Expired entries are never deleted on read; they stay in the backing storage
/// until overwritten or forgotten.
pub struct ExpiringStore {
    /// Backing persistence
    storage: Arc<dyn KeyValueStorage>,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
    /// Default TTL in minutes for `set` calls without explicit TTL
    default_ttl_minutes: u64,
    /// Read/write counters
    stats: Mutex<CacheStats>,
}

impl ExpiringStore {
    // == Constructors ==
    /// Creates a store over `storage` using wall-clock time.
    ///
    /// # Arguments
    /// * `storage` - The backing key-value storage
    /// * `default_ttl_minutes` - TTL applied by `set` when none is given
    pub fn new(storage: Arc<dyn KeyValueStorage>, default_ttl_minutes: u64) -> Self {
        Self::with_clock(storage, default_ttl_minutes, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit time source.
    pub fn with_clock(
        storage: Arc<dyn KeyValueStorage>,
        default_ttl_minutes: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            clock,
            default_ttl_minutes,
            stats: Mutex::new(CacheStats::new()),
        }
    }

    // == Get ==
    /// Returns the live value stored under `key`.
    ///
    /// Absent, unparseable and expired entries all read as `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entry(key);
        if self.is_expired(entry.as_ref()) {
            debug!("Cache miss for key '{}'", key);
            self.record(CacheStats::record_miss);
            return None;
        }

        debug!("Cache hit for key '{}'", key);
        self.record(CacheStats::record_hit);
        entry.map(|entry| entry.value)
    }

    // == Entry ==
    /// Returns the parsed entry for `key`, expired or not.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        let raw = self.storage.get_item(key)?;
        let entry = CacheEntry::decode(&raw);
        if entry.is_none() {
            debug!("Discarding malformed cache entry for key '{}'", key);
        }
        entry
    }

    // == Set ==
    /// Stores `value` under `key`, expiring after `ttl_minutes`.
    ///
    /// Any previous entry is replaced, not merged.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl_minutes` - Optional TTL in minutes (uses the default if None)
    pub fn set(&self, key: &str, value: Value, ttl_minutes: Option<u64>) -> Result<()> {
        let ttl = ttl_minutes.unwrap_or(self.default_ttl_minutes);
        let entry = CacheEntry::expiring(value, self.clock.now_ms(), ttl);
        self.put_entry(key, entry)
    }

    // == Forever ==
    /// Stores `value` under `key` without expiration.
    pub fn forever(&self, key: &str, value: Value) -> Result<()> {
        self.put_entry(key, CacheEntry::permanent(value))
    }

    // == Put Entry ==
    /// Persists an already-built entry unchanged, keeping its expiration.
    pub fn put_entry(&self, key: &str, entry: CacheEntry) -> Result<()> {
        let raw = entry.encode()?;
        self.storage.set_item(key, raw)?;
        self.record(CacheStats::record_write);
        Ok(())
    }

    // == Forget ==
    /// Removes the entry for `key`. Forgetting a missing key is a no-op.
    pub fn forget(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key)?;
        self.record(CacheStats::record_forget);
        Ok(())
    }

    // == Is Expired ==
    /// Decides staleness. A missing entry counts as expired; an entry without
    /// expiration never does.
    pub fn is_expired(&self, entry: Option<&CacheEntry>) -> bool {
        match entry {
            Some(entry) => entry.is_expired_at(self.clock.now_ms()),
            None => true,
        }
    }

    // == Time To Live ==
    /// Remaining lifetime of the live entry under `key`.
    ///
    /// None if the entry is missing, expired or never expires.
    pub fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        let entry = self.entry(key)?;
        let now = self.clock.now_ms();
        if entry.is_expired_at(now) {
            return None;
        }
        entry.ttl_remaining_ms(now)
    }

    // == Accessors ==
    pub fn default_ttl_minutes(&self) -> u64 {
        self.default_ttl_minutes
    }

    /// Returns a snapshot of the current counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn record(&self, update: fn(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            update(&mut stats);
        }
    }
}

impl fmt::Debug for ExpiringStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringStore")
            .field("default_ttl_minutes", &self.default_ttl_minutes)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
