//! API route handlers
//!
//! - `embedding`: the custom embedding skill endpoint
//! - `health`: liveness, readiness and counters

pub mod embedding;
pub mod health;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Service name and available endpoints (GET /, no auth).
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Custom Embedding Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/get_custom_embedding",
            "/api/get_custom_embedding",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
