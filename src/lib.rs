//! Fetch Cache - An expiring key-value cache with a fetch-or-cache orchestrator
//!
//! Cached data is returned while it is live; otherwise the caller's fetch
//! strategy runs and its result is stored with a time-to-live.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod origin;
pub mod storage;

pub use api::AppState;
pub use cache::{CacheEntry, ExpiringStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{FetchOrchestrator, FetchStrategy, TtlOverride};
