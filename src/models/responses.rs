//! Response DTOs for the demo HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for reading an entry (GET /entries/:key)
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
    /// Remaining lifetime in milliseconds, None for entries that never expire
    pub ttl_remaining_ms: Option<u64>,
}

impl EntryResponse {
    pub fn new(key: impl Into<String>, value: Value, ttl_remaining_ms: Option<u64>) -> Self {
        Self {
            key: key.into(),
            value,
            ttl_remaining_ms,
        }
    }
}

/// Response body for writing an entry (PUT /entries)
#[derive(Debug, Clone, Serialize)]
pub struct PutEntryResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: String,
}

impl PutEntryResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for forgetting an entry (DELETE /entries/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ForgetResponse {
    /// Success message
    pub message: String,
    /// The key that was forgotten
    pub key: String,
}

impl ForgetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' forgotten", key),
            key,
        }
    }
}

/// Response body for orchestrated reads (GET /data/:dataset/:param)
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse {
    /// Composite cache key the data lives under
    pub key: String,
    /// The data, cached or freshly fetched
    pub data: Value,
}

impl DataResponse {
    pub fn new(key: impl Into<String>, data: Value) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing usable
    pub misses: u64,
    /// Entries written
    pub writes: u64,
    /// Forget calls
    pub forgets: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Fetches served by the origin
    pub origin_requests: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, origin_requests: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            forgets: stats.forgets,
            hit_rate: stats.hit_rate(),
            origin_requests,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
