//! Cache Entry Module
//!
//! Defines the persisted shape of a cache entry with optional expiration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::MS_PER_MINUTE;

// == Cache Entry ==
/// A cached value and its expiration metadata.
///
/// Persisted as `{"value": ..., "expires": <epoch ms>}`. The `expires` field is
/// omitted for entries that never expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    #[serde(rename = "expires", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructors ==
    /// Creates an entry that expires `ttl_minutes` after `now_ms`.
    pub fn expiring(value: Value, now_ms: u64, ttl_minutes: u64) -> Self {
        let ttl_ms = ttl_minutes.saturating_mul(MS_PER_MINUTE);
        Self {
            value,
            expires_at: Some(now_ms.saturating_add(ttl_ms)),
        }
    }

    /// Creates an entry without expiration.
    pub fn permanent(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time. Entries without expiration never expire.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds at `now_ms`.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.expires_at.map(|expires| expires.saturating_sub(now_ms))
    }

    // == Codec ==
    /// Parses persisted text. Returns None for anything that is not an entry.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Encodes the entry for persistence.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
