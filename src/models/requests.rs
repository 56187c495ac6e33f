//! Request DTOs for the demo HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for writing an entry (PUT /entries)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl_minutes`: Optional TTL in minutes (uses the store default if not specified)
/// - `forever`: Store without expiration; takes precedence over `ttl_minutes`
#[derive(Debug, Clone, Deserialize)]
pub struct PutEntryRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in minutes
    #[serde(default)]
    pub ttl_minutes: Option<u64>,
    /// Never expire
    #[serde(default)]
    pub forever: bool,
}

impl PutEntryRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.trim().is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.forever && self.ttl_minutes.is_some() {
            return Some("Use either 'forever' or 'ttl_minutes', not both".to_string());
        }
        None
    }
}
