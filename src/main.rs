//! winecountry-web server entry point.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use winecountry_web::cache::{start_cache_warmer, AppCache};
use winecountry_web::config::AppConfig;
use winecountry_web::{build_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("winecountry_web=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "Starting winecountry-web");

    let pool = db::connect(&config).await?;
    let cache = AppCache::new(config.pricing_cache_ttl);

    tokio::spawn(start_cache_warmer(
        cache.clone(),
        pool.clone(),
        config.cache_refresh_interval,
    ));

    let app = build_router(AppState::new(pool, cache));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
