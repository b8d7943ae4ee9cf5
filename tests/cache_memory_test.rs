// ABOUTME: Integration tests for the in-memory cache backend
// ABOUTME: Covers TTL expiry, invalidation, LRU capacity, and key normalization

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::test_cache_settings;
use larder::cache::{memory::InMemoryCache, CacheKey, CacheProvider, CacheSettings};
use larder::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TestData {
    value: String,
    count: u32,
}

fn sample() -> TestData {
    TestData {
        value: "penne".into(),
        count: 2,
    }
}

#[tokio::test]
async fn test_set_and_get_round_trip() -> AppResult<()> {
    let cache = InMemoryCache::new(test_cache_settings()).await?;
    let key = CacheKey::recipe_by_id("52771");

    cache.set(&key, &sample(), Duration::from_secs(10)).await?;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, Some(sample()));
    assert!(cache.exists(&key).await?);

    Ok(())
}

#[tokio::test]
async fn test_entries_expire_after_ttl() -> AppResult<()> {
    let cache = InMemoryCache::new(test_cache_settings()).await?;
    let key = CacheKey::recipe_by_id("52771");

    cache.set(&key, &sample(), Duration::from_millis(50)).await?;
    assert!(cache.exists(&key).await?);

    tokio::time::sleep(Duration::from_millis(80)).await;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, None);
    assert!(!cache.exists(&key).await?);

    Ok(())
}

#[tokio::test]
async fn test_ttl_reports_remaining_time() -> AppResult<()> {
    let cache = InMemoryCache::new(test_cache_settings()).await?;
    let key = CacheKey::search("arrabiata");

    cache.set(&key, &sample(), Duration::from_secs(60)).await?;

    let remaining = cache.ttl(&key).await?.expect("live entry has a TTL");
    assert!(remaining <= Duration::from_secs(60));
    assert!(remaining > Duration::from_secs(50));

    assert!(cache.ttl(&CacheKey::search("missing")).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_invalidate_and_clear_all() -> AppResult<()> {
    let cache = InMemoryCache::new(test_cache_settings()).await?;
    let first = CacheKey::recipe_by_id("1");
    let second = CacheKey::recipe_by_id("2");

    cache.set(&first, &sample(), Duration::from_secs(60)).await?;
    cache.set(&second, &sample(), Duration::from_secs(60)).await?;

    cache.invalidate(&first).await?;
    assert!(!cache.exists(&first).await?);
    assert!(cache.exists(&second).await?);

    cache.clear_all().await?;
    assert!(!cache.exists(&second).await?);

    Ok(())
}

#[tokio::test]
async fn test_capacity_evicts_least_recently_used() -> AppResult<()> {
    let settings = CacheSettings {
        max_entries: 2,
        ..test_cache_settings()
    };
    let cache = InMemoryCache::new(settings).await?;

    let first = CacheKey::recipe_by_id("1");
    let second = CacheKey::recipe_by_id("2");
    let third = CacheKey::recipe_by_id("3");

    cache.set(&first, &sample(), Duration::from_secs(60)).await?;
    cache.set(&second, &sample(), Duration::from_secs(60)).await?;

    // Touch the first entry so the second becomes least recently used.
    let _: Option<TestData> = cache.get(&first).await?;
    cache.set(&third, &sample(), Duration::from_secs(60)).await?;

    assert!(cache.exists(&first).await?);
    assert!(!cache.exists(&second).await?);
    assert!(cache.exists(&third).await?);

    Ok(())
}

#[tokio::test]
async fn test_background_sweep_survives_dropping_a_clone() -> AppResult<()> {
    let settings = CacheSettings {
        max_entries: 2,
        cleanup_interval: Duration::from_millis(100),
        enable_background_cleanup: true,
    };
    let cache = InMemoryCache::new(settings).await?;

    let live = CacheKey::recipe_by_id("live");
    let fleeting = CacheKey::recipe_by_id("fleeting");

    // The live entry is inserted first, making it the eviction candidate
    // unless the sweep frees capacity by removing the expired one.
    cache.set(&live, &sample(), Duration::from_secs(60)).await?;
    cache.set(&fleeting, &sample(), Duration::from_millis(30)).await?;

    let clone = cache.clone();
    drop(clone);

    // Give the sweep task time to run past the fleeting entry's expiry.
    tokio::time::sleep(Duration::from_millis(250)).await;

    cache
        .set(&CacheKey::recipe_by_id("new"), &sample(), Duration::from_secs(60))
        .await?;

    // With the sweep still alive, capacity was reclaimed and the live
    // entry was never evicted.
    assert!(cache.exists(&live).await?);
    assert!(!cache.exists(&fleeting).await?);

    Ok(())
}

#[tokio::test]
async fn test_equivalent_search_queries_share_an_entry() -> AppResult<()> {
    let cache = InMemoryCache::new(test_cache_settings()).await?;

    cache
        .set(&CacheKey::search("  Chicken  "), &sample(), Duration::from_secs(60))
        .await?;

    let retrieved: Option<TestData> = cache.get(&CacheKey::search("chicken")).await?;
    assert_eq!(retrieved, Some(sample()));

    Ok(())
}
