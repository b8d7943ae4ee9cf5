// ABOUTME: TheMealDB API gateway with time-bounded response caching
// ABOUTME: Lookup-by-id, search-by-name, and random fetch; failures degrade to empty results

//! TheMealDB gateway
//!
//! Three read-only endpoints share one JSON envelope: a `meals` array that
//! may be null or absent. Any transport error, non-success status, timeout,
//! or unexpected body is treated as "not found" and logged at `warn`; the
//! caller never sees an upstream error. Responses are cached (per-id and
//! per-normalized-query for an hour, random in a rotating per-minute bucket
//! for five minutes). Persistence is a separate explicit step performed by
//! the caller through the repository.

use crate::cache::{memory::InMemoryCache, CacheKey, CacheProvider, CacheSettings};
use crate::errors::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

/// Default TheMealDB API root
const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";
/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// TheMealDB payloads carry up to 20 numbered ingredient/measure slots
const INGREDIENT_SLOTS: usize = 20;

/// Gateway settings
#[derive(Debug, Clone)]
pub struct MealDbConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// Bound on every request; a timeout reads as "not found"
    pub timeout: Duration,
}

impl Default for MealDbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// One meal object from the TheMealDB envelope
///
/// The flat payload carries up to 20 numbered `strIngredientN` /
/// `strMeasureN` field pairs; those land in the flattened remainder map and
/// are read through [`MealPayload::ingredient_lines`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPayload {
    /// Stable TheMealDB identifier
    #[serde(rename = "idMeal")]
    pub id: String,
    /// Meal title
    #[serde(rename = "strMeal")]
    pub title: String,
    /// Image URL
    #[serde(rename = "strMealThumb")]
    pub thumbnail: Option<String>,
    /// Free-text instructions blob, with embedded step-label noise
    #[serde(rename = "strInstructions")]
    pub instructions: Option<String>,
    /// Category tag
    #[serde(rename = "strCategory")]
    pub category: Option<String>,
    /// Cuisine/area tag
    #[serde(rename = "strArea")]
    pub area: Option<String>,
    /// Video link
    #[serde(rename = "strYoutube")]
    pub youtube: Option<String>,
    /// Original source link
    #[serde(rename = "strSource")]
    pub source: Option<String>,
    /// Remaining fields, including the numbered ingredient/measure pairs
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MealPayload {
    /// Combine the numbered measure/ingredient pairs into display lines
    ///
    /// Every slot with a non-empty ingredient yields `"{measure}
    /// {ingredient}"` trimmed at the ends; slots without an ingredient are
    /// skipped even when a measure is present.
    #[must_use]
    pub fn ingredient_lines(&self) -> Vec<String> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|slot| {
                let ingredient = self.text_field(&format!("strIngredient{slot}"))?;
                let measure = self.text_field(&format!("strMeasure{slot}")).unwrap_or("");
                Some(format!("{measure} {ingredient}").trim().to_owned())
            })
            .collect()
    }

    /// Non-empty string value of a flattened field, if present
    fn text_field(&self, name: &str) -> Option<&str> {
        match self.extra.get(name) {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Response envelope shared by all three endpoints
#[derive(Debug, Deserialize)]
struct MealsEnvelope {
    meals: Option<Vec<MealPayload>>,
}

/// TheMealDB gateway with read-through caching
#[derive(Clone)]
pub struct MealDbProvider {
    client: Client,
    config: MealDbConfig,
    cache: InMemoryCache,
}

impl MealDbProvider {
    /// Create a gateway with its own HTTP client and cache
    pub async fn new(config: MealDbConfig, cache_settings: CacheSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))?;
        let cache = InMemoryCache::new(cache_settings).await?;

        Ok(Self {
            client,
            config,
            cache,
        })
    }

    /// Look up a meal by TheMealDB id, cached per-id for an hour
    pub async fn fetch_by_id(&self, id: &str) -> AppResult<Option<MealPayload>> {
        let key = CacheKey::recipe_by_id(id);
        if let Some(hit) = self.cache.get::<MealPayload>(&key).await? {
            return Ok(Some(hit));
        }

        let meals = self
            .request_meals("lookup.php", &[("i", id)])
            .await
            .unwrap_or_default();
        let Some(payload) = meals.into_iter().next() else {
            return Ok(None);
        };

        self.cache.set(&key, &payload, key.recommended_ttl()).await?;
        Ok(Some(payload))
    }

    /// Search meals by name, cached per-normalized-query for an hour
    ///
    /// A successful response with no hits is cached as an empty list; a
    /// transport failure is not cached, so the next request retries.
    pub async fn search_by_name(&self, query: &str) -> AppResult<Vec<MealPayload>> {
        let key = CacheKey::search(query);
        if let Some(hit) = self.cache.get::<Vec<MealPayload>>(&key).await? {
            return Ok(hit);
        }

        match self.request_meals("search.php", &[("s", query)]).await {
            Some(meals) => {
                self.cache.set(&key, &meals, key.recommended_ttl()).await?;
                Ok(meals)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Fetch a random meal
    ///
    /// The cache key rotates every minute while the entry expires after
    /// five; rapid repeat requests inside one minute share a result.
    pub async fn fetch_random(&self) -> AppResult<Option<MealPayload>> {
        let key = CacheKey::random_now();
        if let Some(hit) = self.cache.get::<MealPayload>(&key).await? {
            return Ok(Some(hit));
        }

        let meals = self.request_meals("random.php", &[]).await.unwrap_or_default();
        let Some(payload) = meals.into_iter().next() else {
            return Ok(None);
        };

        self.cache.set(&key, &payload, key.recommended_ttl()).await?;
        Ok(Some(payload))
    }

    /// Drop the cached lookup for one meal id
    pub async fn clear_cached_recipe(&self, id: &str) -> AppResult<()> {
        self.cache.invalidate(&CacheKey::recipe_by_id(id)).await
    }

    /// Drop every cached response
    pub async fn clear_cache(&self) -> AppResult<()> {
        self.cache.clear_all().await
    }

    /// The gateway's cache, for inspection
    #[must_use]
    pub const fn cache(&self) -> &InMemoryCache {
        &self.cache
    }

    /// Issue one GET and unwrap the meals envelope
    ///
    /// Returns None only on transport/decoding failure; a successful
    /// response with a null or absent `meals` array yields an empty list.
    async fn request_meals(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Option<Vec<MealPayload>> {
        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));

        let response = match self.client.get(&url).query(params).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, endpoint, "TheMealDB request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), endpoint, "TheMealDB returned non-success status");
            return None;
        }

        match response.json::<MealsEnvelope>().await {
            Ok(envelope) => Some(envelope.meals.unwrap_or_default()),
            Err(error) => {
                warn!(%error, endpoint, "TheMealDB response decode failed");
                None
            }
        }
    }
}
