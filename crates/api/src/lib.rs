//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The conversion route (`GET /`)
//! - A health check (`GET /health`)
//! - Mapping of application errors to the generic 410 response

pub mod error;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use xrate_feed::RateService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Builds rate tables and converts amounts.
    pub rate_service: Arc<RateService>,
}

impl AppState {
    /// Wraps a rate service for sharing between handlers.
    pub fn new(rate_service: RateService) -> Self {
        Self {
            rate_service: Arc::new(rate_service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
