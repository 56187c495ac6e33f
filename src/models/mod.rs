//! Request and Response models for the demo HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::PutEntryRequest;
pub use responses::{
    DataResponse, EntryResponse, ErrorResponse, ForgetResponse, HealthResponse, PutEntryResponse,
    StatsResponse,
};
