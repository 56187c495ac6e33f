//! API Handlers
//!
//! HTTP request handlers for each demo server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::ExpiringStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{FetchOrchestrator, TracingNotifier, TracingProgress};
use crate::models::{
    DataResponse, EntryResponse, ForgetResponse, HealthResponse, PutEntryRequest,
    PutEntryResponse, StatsResponse,
};
use crate::origin::SimulatedOrigin;
use crate::storage::MemoryStorage;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Expiring store shared by every dataset
    pub store: Arc<ExpiringStore>,
    /// Upstream the data endpoints fetch from
    pub origin: Arc<SimulatedOrigin>,
}

impl AppState {
    /// Creates a new AppState with the given store and origin.
    pub fn new(store: ExpiringStore, origin: SimulatedOrigin) -> Self {
        Self {
            store: Arc::new(store),
            origin: Arc::new(origin),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses in-memory storage and a simulated origin with the configured latency.
    pub fn from_config(config: &Config) -> Self {
        let store = ExpiringStore::new(Arc::new(MemoryStorage::new()), config.default_ttl_minutes);
        let origin = SimulatedOrigin::new(Duration::from_millis(config.origin_latency_ms));
        Self::new(store, origin)
    }

    /// Orchestrator caching `dataset` in the shared store.
    fn orchestrator(&self, dataset: &str) -> FetchOrchestrator {
        FetchOrchestrator::new(self.origin.clone())
            .with_cache(self.store.clone(), dataset)
            .with_progress(Arc::new(TracingProgress))
            .with_notifier(Arc::new(TracingNotifier))
    }
}

/// Handler for PUT /entries
///
/// Stores a value with its TTL, or without expiration when `forever` is set.
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Json(req): Json<PutEntryRequest>,
) -> Result<Json<PutEntryResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    if req.forever {
        state.store.forever(&req.key, req.value)?;
    } else {
        state.store.set(&req.key, req.value, req.ttl_minutes)?;
    }

    Ok(Json(PutEntryResponse::new(req.key)))
}

/// Handler for GET /entries/:key
///
/// Returns the live value; missing, corrupt and expired entries are 404.
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let value = state
        .store
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;
    let ttl_remaining_ms = state.store.ttl_remaining_ms(&key);

    Ok(Json(EntryResponse::new(key, value, ttl_remaining_ms)))
}

/// Handler for DELETE /entries/:key
///
/// Forgetting is idempotent: unknown keys succeed too.
pub async fn forget_entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ForgetResponse>> {
    state.store.forget(&key)?;

    Ok(Json(ForgetResponse::new(key)))
}

/// Handler for GET /data/:dataset/:param
///
/// Serves from cache when live, otherwise fetches from the origin.
pub async fn data_handler(
    State(state): State<AppState>,
    Path((dataset, param)): Path<(String, String)>,
) -> Result<Json<DataResponse>> {
    let orchestrator = state.orchestrator(&dataset);
    let params = [Value::String(param)];

    let data = orchestrator.get_or_fetch(&params).await?;
    let key = orchestrator.cache_key(&params).unwrap_or(dataset);

    Ok(Json(DataResponse::new(key, data)))
}

/// Handler for POST /data/:dataset/:param/refresh
///
/// Always fetches from the origin and overwrites the cached entry.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Path((dataset, param)): Path<(String, String)>,
) -> Result<Json<DataResponse>> {
    let orchestrator = state.orchestrator(&dataset);
    let params = [Value::String(param)];

    let data = orchestrator.fetch(&params).await?;
    let key = orchestrator.cache_key(&params).unwrap_or(dataset);

    Ok(Json(DataResponse::new(key, data)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.store.stats();

    Json(StatsResponse::new(&stats, state.origin.requests()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
