//! In-memory caching using moka
//!
//! Holds the tier/modifier configuration per service type so quotes do not hit
//! the database on every keystroke of the admin calculator. Configuration is
//! only changed through the admin endpoints, which invalidate on write.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::models::{PricingConfig, ServiceType};
use crate::pricing::queries;

/// Application cache holding pricing configuration
#[derive(Clone)]
pub struct AppCache {
    /// Active tiers and modifiers (service type -> PricingConfig)
    pub pricing: Cache<ServiceType, Arc<PricingConfig>>,
}

impl AppCache {
    /// Create a new cache instance whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            // One entry per service type
            pricing: Cache::builder()
                .max_capacity(16)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            pricing_entries: self.pricing.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.pricing.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate the configuration of one service type
    pub async fn invalidate_service(&self, service_type: ServiceType) {
        self.pricing.invalidate(&service_type).await;
        info!("Cache invalidated for service type: {}", service_type);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(5 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub pricing_entries: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every `refresh` interval.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, refresh: Duration) {
    let mut interval = interval(refresh);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Load the configuration of every service type into the cache
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    for service_type in ServiceType::ALL {
        match queries::load_pricing_config(db, service_type).await {
            Ok(config) => {
                cache.pricing.insert(service_type, Arc::new(config)).await;
            }
            Err(e) => warn!("Failed to warm {} pricing cache: {}", service_type, e),
        }
    }

    cache.pricing.run_pending_tasks().await;
    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
