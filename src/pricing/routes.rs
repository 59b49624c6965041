//! HTTP routes for the pricing engine.
//!
//! `POST /api/pricing/calculate` is the quote contract used by the admin
//! calculator and the booking flows; `/api/admin/pricing/*` maintains tiers
//! and modifiers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::AppState;

use super::models::TransferType;
use super::queries;
use super::requests::{CalculatePriceRequest, ModifierInput, ModifierListQuery, TierInput, TierListQuery};
use super::responses::{
    ModifierListResponse, ModifierResponse, PriceQuoteResponse, TierListResponse, TierResponse,
    TransferTypeResponse,
};

/// Pricing routes, mounted at the application root
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/calculate", post(calculate))
        .route("/api/pricing/transfer-types", get(transfer_types))
        .route("/api/admin/pricing/tiers", get(list_tiers).post(create_tier))
        .route(
            "/api/admin/pricing/tiers/:id",
            put(update_tier).delete(deactivate_tier),
        )
        .route(
            "/api/admin/pricing/modifiers",
            get(list_modifiers).post(create_modifier),
        )
        .route(
            "/api/admin/pricing/modifiers/:id",
            put(update_modifier).delete(deactivate_modifier),
        )
}

/// Calculate a price quote
pub async fn calculate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CalculatePriceRequest>, JsonRejection>,
) -> Result<Json<PriceQuoteResponse>> {
    let Json(request) = payload?;
    let service_type = request.service_type;

    let quote = state.resolver.calculate(request).await.map_err(|e| {
        tracing::debug!(service_type = %service_type, error = %e, "Price calculation failed");
        AppError::from(e)
    })?;

    tracing::debug!(
        service_type = %service_type,
        tier_id = quote.tier_used.id,
        final_price = %quote.final_price,
        "Price calculated"
    );
    Ok(Json(quote.into()))
}

/// List the named transfer routes
pub async fn transfer_types() -> Json<Vec<TransferTypeResponse>> {
    Json(TransferType::ALL.into_iter().map(TransferTypeResponse::from).collect())
}

pub async fn list_tiers(
    State(state): State<AppState>,
    query: std::result::Result<Query<TierListQuery>, QueryRejection>,
) -> Result<Json<TierListResponse>> {
    let Query(query) = query?;
    let tiers = queries::list_tiers(&state.db, query.service_type, query.include_inactive).await?;
    Ok(Json(TierListResponse {
        success: true,
        tiers,
    }))
}

pub async fn create_tier(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TierInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TierResponse>)> {
    let Json(input) = payload?;
    input.validate()?;

    let tier = queries::insert_tier(&state.db, &input).await?;
    state.cache.invalidate_service(tier.service_type).await;
    tracing::info!(tier_id = tier.id, tier_name = %tier.tier_name, "Pricing tier created");

    Ok((
        StatusCode::CREATED,
        Json(TierResponse {
            success: true,
            tier,
        }),
    ))
}

pub async fn update_tier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: std::result::Result<Json<TierInput>, JsonRejection>,
) -> Result<Json<TierResponse>> {
    let Json(input) = payload?;
    input.validate()?;

    let tier = queries::update_tier(&state.db, id, &input)
        .await?
        .ok_or(AppError::NotFound)?;
    // The service type may have changed, so drop every cached config
    state.cache.invalidate_all();
    tracing::info!(tier_id = tier.id, "Pricing tier updated");

    Ok(Json(TierResponse {
        success: true,
        tier,
    }))
}

pub async fn deactivate_tier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TierResponse>> {
    let tier = queries::deactivate_tier(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate_service(tier.service_type).await;
    tracing::info!(tier_id = tier.id, "Pricing tier deactivated");

    Ok(Json(TierResponse {
        success: true,
        tier,
    }))
}

pub async fn list_modifiers(
    State(state): State<AppState>,
    query: std::result::Result<Query<ModifierListQuery>, QueryRejection>,
) -> Result<Json<ModifierListResponse>> {
    let Query(query) = query?;
    let modifiers = queries::list_modifiers(&state.db, query.include_inactive).await?;
    Ok(Json(ModifierListResponse::new(modifiers)))
}

pub async fn create_modifier(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ModifierInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ModifierResponse>)> {
    let Json(input) = payload?;
    input.validate()?;

    let modifier = queries::insert_modifier(&state.db, &input).await?;
    state.cache.invalidate_all();
    tracing::info!(modifier_id = modifier.id, name = %modifier.name, "Pricing modifier created");

    Ok((
        StatusCode::CREATED,
        Json(ModifierResponse {
            success: true,
            modifier,
        }),
    ))
}

pub async fn update_modifier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: std::result::Result<Json<ModifierInput>, JsonRejection>,
) -> Result<Json<ModifierResponse>> {
    let Json(input) = payload?;
    input.validate()?;

    let modifier = queries::update_modifier(&state.db, id, &input)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate_all();
    tracing::info!(modifier_id = modifier.id, "Pricing modifier updated");

    Ok(Json(ModifierResponse {
        success: true,
        modifier,
    }))
}

pub async fn deactivate_modifier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ModifierResponse>> {
    let modifier = queries::deactivate_modifier(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate_all();
    tracing::info!(modifier_id = modifier.id, "Pricing modifier deactivated");

    Ok(Json(ModifierResponse {
        success: true,
        modifier,
    }))
}
