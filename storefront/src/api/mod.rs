//! HTTP API
//!
//! No authentication layer; the storefront's gateway handles sessions.

pub mod health;
pub mod pricing;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(pricing::router())
        .merge(health::router())
}

/// Router with middleware, ready for `with_state`
pub fn build_app() -> Router<ServerState> {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub use crate::utils::{ApiResponse, AppResult};
