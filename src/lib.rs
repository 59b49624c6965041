//! # winecountry-web
//!
//! Pricing service for a wine-country tour operator: quotes wine tours,
//! airport/city transfers and driver wait time from administrator-defined
//! tiers and modifiers.
//!
//! ```text
//! HTTP (axum)
//!   ├── pricing::routes   quote + admin CRUD
//!   ├── routes            health, cache maintenance
//!   │
//! PricingResolver ── calculators / eligibility (pure)
//!   │
//! PgPricingRepository ── AppCache (moka) ── PostgreSQL (sqlx)
//! ```

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use cache::AppCache;
use pricing::{PgPricingRepository, PricingResolver};

/// Shared application state available to all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub resolver: Arc<PricingResolver<PgPricingRepository>>,
}

impl AppState {
    /// Wire the resolver to the database through the shared cache
    pub fn new(db: PgPool, cache: AppCache) -> Self {
        let repository = PgPricingRepository::new(db.clone(), cache.clone());
        Self {
            db,
            cache,
            resolver: Arc::new(PricingResolver::new(repository)),
        }
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(pricing::router())
        .merge(routes::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
