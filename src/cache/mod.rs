// ABOUTME: TTL cache abstraction for remote recipe lookups
// ABOUTME: Structured keys plus a pluggable provider trait; in-memory backend in memory.rs

//! # Response Cache
//!
//! An explicit, owned capability: the gateway constructs one cache at
//! process start and reads through it. Keys are structured values rather
//! than ad-hoc strings, expiry is time-based only, and the only
//! invalidation paths are clear-by-key and clear-all. Concurrent readers
//! and writers are safe; a stampede on an identical key is an accepted
//! inefficiency since the underlying fetch is idempotent.

/// In-memory cache implementation
pub mod memory;

use crate::errors::AppResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// TTL for per-id recipe lookups
pub const TTL_RECIPE_SECS: u64 = 3600;
/// TTL for name searches
pub const TTL_SEARCH_SECS: u64 = 3600;
/// TTL for the random-recipe bucket
pub const TTL_RANDOM_SECS: u64 = 300;

/// Default bound on in-memory entries
const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;
/// Default sweep interval for the background cleanup task
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Cache provider trait for pluggable backend implementations
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create a new cache instance
    async fn new(settings: CacheSettings) -> AppResult<Self>
    where
        Self: Sized;

    /// Store a value with a TTL
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve a value; None on miss or expiry
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Remove a single entry
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Check whether a live entry exists
    async fn exists(&self, key: &CacheKey) -> AppResult<bool>;

    /// Remaining TTL for a live entry
    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>>;

    /// Remove every entry
    async fn clear_all(&self) -> AppResult<()>;
}

/// Cache sizing and cleanup settings
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Maximum number of entries before LRU eviction
    pub max_entries: usize,
    /// Sweep interval for expired entries
    pub cleanup_interval: Duration,
    /// Run the background sweep task (disable in tests)
    pub enable_background_cleanup: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
        }
    }
}

/// Structured cache key for gateway lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Per-id recipe lookup
    RecipeById {
        /// TheMealDB recipe id
        id: String,
    },
    /// Name search, keyed by the normalized query
    RecipeSearch {
        /// Lowercased, trimmed query
        query: String,
    },
    /// Random recipe, keyed by a coarse time bucket
    RandomRecipe {
        /// Minute-granularity bucket, e.g. "2026-08-25-14-03"
        bucket: String,
    },
}

impl CacheKey {
    /// Key for a per-id lookup
    #[must_use]
    pub fn recipe_by_id(id: &str) -> Self {
        Self::RecipeById { id: id.to_owned() }
    }

    /// Key for a name search; the query is normalized case-insensitively
    /// and trimmed so equivalent searches share an entry
    #[must_use]
    pub fn search(query: &str) -> Self {
        Self::RecipeSearch {
            query: query.trim().to_lowercase(),
        }
    }

    /// Key for the current random-recipe bucket
    ///
    /// The bucket rotates every minute while the entry carries an
    /// independent 5-minute TTL, bounding burst load from repeated
    /// random requests without pinning one result for long.
    #[must_use]
    pub fn random_now() -> Self {
        Self::RandomRecipe {
            bucket: Utc::now().format("%Y-%m-%d-%H-%M").to_string(),
        }
    }

    /// Recommended TTL for this key's resource type
    #[must_use]
    pub const fn recommended_ttl(&self) -> Duration {
        match self {
            Self::RecipeById { .. } => Duration::from_secs(TTL_RECIPE_SECS),
            Self::RecipeSearch { .. } => Duration::from_secs(TTL_SEARCH_SECS),
            Self::RandomRecipe { .. } => Duration::from_secs(TTL_RANDOM_SECS),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecipeById { id } => write!(f, "recipe:id:{id}"),
            Self::RecipeSearch { query } => write!(f, "recipe:search:{query}"),
            Self::RandomRecipe { bucket } => write!(f, "recipe:random:{bucket}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_key_normalization() {
        assert_eq!(CacheKey::search("  Chicken  "), CacheKey::search("chicken"));
        assert_eq!(CacheKey::search("PASTA").to_string(), "recipe:search:pasta");
    }

    #[test]
    fn test_key_display_forms() {
        assert_eq!(
            CacheKey::recipe_by_id("52772").to_string(),
            "recipe:id:52772"
        );
        let CacheKey::RandomRecipe { bucket } = CacheKey::random_now() else {
            panic!("random_now produces a RandomRecipe key");
        };
        assert_eq!(bucket.matches('-').count(), 4);
    }
}
