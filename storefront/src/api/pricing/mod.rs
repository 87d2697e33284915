//! Product pricing API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/products/{id}/tiers | GET | stored tier set |
//! | /api/products/{id}/tiers | PUT | atomic replace of the tier set |
//! | /api/products/{id}/tiers/validate | POST | check a draft tier set, no writes |
//! | /api/products/{id}/quote?quantity=N | GET | price N units |
//! | /api/products/{id}/pricing-mode | PUT | switch simple / tiered pricing |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/{id}/tiers",
            get(handler::list_tiers).put(handler::replace_tiers),
        )
        .route("/{id}/tiers/validate", post(handler::validate_tiers))
        .route("/{id}/quote", get(handler::quote))
        .route("/{id}/pricing-mode", put(handler::change_mode))
}
