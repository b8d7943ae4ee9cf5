// ABOUTME: Environment-based runtime configuration
// ABOUTME: Parses database, gateway, and cache settings from environment variables

//! Environment-only configuration
//!
//! All settings come from environment variables with sensible defaults, so a
//! deployment needs nothing beyond its environment to start.

use crate::cache::CacheSettings;
use crate::providers::mealdb::MealDbConfig;
use std::env;
use std::time::Duration;
use tracing::info;

/// Default SQLite database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/larder.db";

/// Top-level runtime configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite connection string
    pub database_url: String,
    /// TheMealDB gateway settings
    pub mealdb: MealDbConfig,
    /// Cache sizing and cleanup settings
    pub cache: CacheSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());

        let mut mealdb = MealDbConfig::default();
        if let Ok(base_url) = env::var("MEALDB_BASE_URL") {
            mealdb.base_url = base_url;
        }
        if let Some(secs) = parse_env_u64("MEALDB_TIMEOUT_SECS") {
            mealdb.timeout = Duration::from_secs(secs);
        }

        let mut cache = CacheSettings::default();
        if let Some(max_entries) = parse_env_u64("CACHE_MAX_ENTRIES") {
            cache.max_entries = usize::try_from(max_entries).unwrap_or(cache.max_entries);
        }
        if let Some(secs) = parse_env_u64("CACHE_CLEANUP_INTERVAL_SECS") {
            cache.cleanup_interval = Duration::from_secs(secs);
        }

        let config = Self {
            database_url,
            mealdb,
            cache,
        };

        info!(
            database_url = %config.database_url,
            mealdb_base_url = %config.mealdb.base_url,
            mealdb_timeout_secs = config.mealdb.timeout.as_secs(),
            cache_max_entries = config.cache.max_entries,
            "configuration loaded"
        );

        config
    }
}

/// Parse a numeric environment variable, ignoring unset or malformed values
fn parse_env_u64(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}
