//! Health and cache maintenance handlers

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::cache::CacheStats;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

/// Service health. Always 200; a database outage is reported as `degraded`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: if database == "ok" { "healthy" } else { "degraded" },
        database,
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Pricing cache statistics
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    state.cache.pricing.run_pending_tasks().await;
    Json(state.cache.stats())
}

/// Drop all cached pricing configuration
pub async fn invalidate_cache(State(state): State<AppState>) -> Json<CacheStats> {
    state.cache.invalidate_all();
    state.cache.pricing.run_pending_tasks().await;
    Json(state.cache.stats())
}
