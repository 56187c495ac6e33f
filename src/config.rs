//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in minutes for cache writes without an override
    pub default_ttl_minutes: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Simulated origin latency in milliseconds
    pub origin_latency_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MINUTES` - Default TTL in minutes (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `ORIGIN_LATENCY_MS` - Simulated origin latency (default: 250)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_minutes: env_or("DEFAULT_TTL_MINUTES", defaults.default_ttl_minutes),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            origin_latency_ms: env_or("ORIGIN_LATENCY_MS", defaults.origin_latency_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_minutes: 60,
            server_port: 3000,
            origin_latency_ms: 250,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
