//! Product Pricing API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{PriceTier, PriceTierInput, PricingMode, Product};
use shared::pricing::{PricingResult, TierValidationError};

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ModeChangeRequest {
    pub mode: PricingMode,
    /// Caller acknowledged that the abandoned mode's data will be cleared
    #[serde(default)]
    pub confirmed: bool,
}

/// GET /api/products/{id}/tiers - stored tiers, lowest band first
pub async fn list_tiers(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PriceTier>>> {
    let tiers = state.pricing.get_tiers(id).await?;
    Ok(Json(tiers))
}

/// PUT /api/products/{id}/tiers - replace the whole tier set
pub async fn replace_tiers(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<Vec<PriceTierInput>>,
) -> AppResult<Json<Vec<PriceTier>>> {
    let tiers = state.pricing.save_tiers(id, &payload).await?;
    Ok(Json(tiers))
}

/// POST /api/products/{id}/tiers/validate - rule violations of a draft set
pub async fn validate_tiers(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<Vec<PriceTierInput>>,
) -> AppResult<Json<Vec<TierValidationError>>> {
    state.pricing.get_product(id).await?;
    Ok(Json(state.pricing.validate_tiers(&payload)))
}

/// GET /api/products/{id}/quote?quantity=N
pub async fn quote(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<QuoteQuery>,
) -> AppResult<Json<PricingResult>> {
    let result = state.pricing.quote(id, query.quantity).await?;
    Ok(Json(result))
}

/// PUT /api/products/{id}/pricing-mode
pub async fn change_mode(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ModeChangeRequest>,
) -> AppResult<Json<Product>> {
    let product = state
        .pricing
        .change_mode(id, payload.mode, payload.confirmed)
        .await?;
    Ok(Json(product))
}
