//! API Routes
//!
//! Configures the Axum router with all demo server endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    data_handler, forget_entry_handler, get_entry_handler, health_handler, put_entry_handler,
    refresh_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /entries` - Store a value
/// - `GET /entries/:key` - Read a live value
/// - `DELETE /entries/:key` - Forget a key
/// - `GET /data/:dataset/:param` - Cached read through the origin
/// - `POST /data/:dataset/:param/refresh` - Forced refresh
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/entries", put(put_entry_handler))
        .route(
            "/entries/:key",
            get(get_entry_handler).delete(forget_entry_handler),
        )
        .route("/data/:dataset/:param", get(data_handler))
        .route("/data/:dataset/:param/refresh", post(refresh_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
