//! Read-only access to tier/modifier configuration.
//!
//! The resolver only ever sees a [`PricingRepository`]; production wiring uses
//! [`PgPricingRepository`] (moka cache in front of PostgreSQL), tests and
//! offline tools use [`StaticPricingRepository`].

use std::future::Future;
use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::AppCache;

use super::models::{PricingConfig, PricingModifier, PricingTier, ServiceType};
use super::queries;
use super::services::PricingError;

/// Source of the pricing configuration for a service type.
pub trait PricingRepository: Send + Sync {
    fn load(
        &self,
        service_type: ServiceType,
    ) -> impl Future<Output = Result<Arc<PricingConfig>, PricingError>> + Send;
}

/// PostgreSQL-backed repository with an in-memory cache per service type.
#[derive(Clone)]
pub struct PgPricingRepository {
    pool: PgPool,
    cache: AppCache,
}

impl PgPricingRepository {
    pub fn new(pool: PgPool, cache: AppCache) -> Self {
        Self { pool, cache }
    }
}

impl PricingRepository for PgPricingRepository {
    /// Concurrent misses for the same service type share one database load.
    /// Failed loads are not cached.
    async fn load(&self, service_type: ServiceType) -> Result<Arc<PricingConfig>, PricingError> {
        self.cache
            .pricing
            .try_get_with(service_type, async {
                tracing::debug!(service_type = %service_type, "Cache MISS for pricing config");
                queries::load_pricing_config(&self.pool, service_type)
                    .await
                    .map(Arc::new)
            })
            .await
            .map_err(|e| {
                tracing::warn!(service_type = %service_type, error = %e, "Failed to load pricing config");
                PricingError::ConfigurationUnavailable(e.to_string())
            })
    }
}

/// Fixed in-memory configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticPricingRepository {
    tiers: Vec<PricingTier>,
    modifiers: Vec<PricingModifier>,
}

impl StaticPricingRepository {
    pub fn new(tiers: Vec<PricingTier>, modifiers: Vec<PricingModifier>) -> Self {
        Self { tiers, modifiers }
    }
}

impl PricingRepository for StaticPricingRepository {
    async fn load(&self, service_type: ServiceType) -> Result<Arc<PricingConfig>, PricingError> {
        Ok(Arc::new(PricingConfig {
            tiers: self
                .tiers
                .iter()
                .filter(|t| t.active && t.service_type == service_type)
                .cloned()
                .collect(),
            modifiers: self
                .modifiers
                .iter()
                .filter(|m| m.active && m.service_type.map_or(true, |s| s == service_type))
                .cloned()
                .collect(),
        }))
    }
}
