//! Health check endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Currency every rate is expressed against.
    pub base_currency: String,
    /// Number of configured rate sources.
    pub sources: usize,
}

/// Liveness only; sources are not contacted.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let service = &state.rate_service;
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        base_currency: service.base_currency().to_string(),
        sources: service.sources().len(),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
