//! Non-pricing route handlers

pub mod system;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Health and cache maintenance routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/admin/cache/stats", get(system::cache_stats))
        .route("/api/admin/cache/invalidate", post(system::invalidate_cache))
}
