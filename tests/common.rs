// ABOUTME: Shared helpers for integration tests
// ABOUTME: Deterministic id generation, in-memory databases, and gateway construction

#![allow(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use larder::cache::CacheSettings;
use larder::database::{Database, IdGenerator};
use larder::errors::AppResult;
use larder::models::NewUser;
use larder::providers::{MealDbConfig, MealDbProvider};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Id generator producing TESTID0001, TESTID0002, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("TESTID{n:04}")
    }
}

/// Each connection gets its own isolated in-memory database
pub async fn create_test_db() -> AppResult<Database> {
    Database::with_id_generator("sqlite::memory:", Arc::new(SequentialIdGenerator::default()))
        .await
}

/// Cache settings with the background sweep task disabled
pub fn test_cache_settings() -> CacheSettings {
    CacheSettings {
        max_entries: 100,
        cleanup_interval: Duration::from_secs(300),
        enable_background_cleanup: false,
    }
}

/// Gateway pointed at a test server, with a short timeout
pub async fn create_test_provider(base_url: &str) -> AppResult<MealDbProvider> {
    MealDbProvider::new(
        MealDbConfig {
            base_url: base_url.to_owned(),
            timeout: Duration::from_secs(2),
        },
        test_cache_settings(),
    )
    .await
}

/// Insert a user row so recipes and favorites can reference it
pub async fn seed_user(db: &Database, id: &str, email: &str) -> AppResult<()> {
    db.upsert_user(&NewUser {
        id: Some(id.to_owned()),
        name: "Test Cook".into(),
        email: email.to_owned(),
        password: "orange-zest-42".into(),
    })
    .await?;
    Ok(())
}
