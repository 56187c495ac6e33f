//! API Module
//!
//! HTTP handlers and routing for the demo server in front of the cache.
//!
//! # Endpoints
//! - `PUT /entries` - Store a value with a TTL or forever
//! - `GET /entries/:key` - Read a live value
//! - `DELETE /entries/:key` - Forget a key
//! - `GET /data/:dataset/:param` - Cached read through the simulated origin
//! - `POST /data/:dataset/:param/refresh` - Forced refresh from the origin
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
