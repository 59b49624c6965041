//! Service configuration loaded from environment variables.
//!
//! All settings come from the environment (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Top-level service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// How long cached tier/modifier configuration stays valid.
    pub pricing_cache_ttl: Duration,

    /// Interval of the background cache warmer.
    pub cache_refresh_interval: Duration,

    /// Apply `migrations/` on startup.
    pub run_migrations: bool,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults for everything except `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let listen_addr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "LISTEN_ADDR",
                message: e.to_string(),
            })?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
            pricing_cache_ttl: Duration::from_secs(parse_env("PRICING_CACHE_TTL_SECS", 300)),
            cache_refresh_interval: Duration::from_secs(parse_env("CACHE_REFRESH_SECS", 600).max(1)),
            run_migrations: parse_env_bool("RUN_MIGRATIONS", true),
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `true`/`1`/`false`/`0`
/// (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
