// ABOUTME: Database handle, schema migration, and the injectable id generator
// ABOUTME: Repository operations live in the users/recipes/favorites submodules

//! # Database Management
//!
//! One [`Database`] handle owns the SQLite pool and the id-generation
//! capability. Repository operations are split across submodules as
//! `impl Database` blocks: [`users`], [`recipes`], and [`favorites`].
//!
//! Identifier generation is injectable so tests can supply deterministic
//! ids; production uses [`RandomIdGenerator`] (10 uppercase alphanumeric
//! characters, matching the id columns' 10-char budget).

mod favorites;
mod recipes;
mod users;

use crate::errors::AppResult;
use rand::Rng;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;

/// Length of generated recipe and user identifiers
const ID_LENGTH: usize = 10;

/// Capability for producing new short opaque identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce a new identifier
    fn generate(&self) -> String;
}

/// Default generator: uppercase alphanumeric, 10 characters
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let mut rng = rand::thread_rng();
        (0..ID_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Database manager for recipe, favorite, and user storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
    id_gen: Arc<dyn IdGenerator>,
}

impl Database {
    /// Connect with the default random id generator
    pub async fn new(database_url: &str) -> AppResult<Self> {
        Self::with_id_generator(database_url, Arc::new(RandomIdGenerator)).await
    }

    /// Connect with an injected id generator
    pub async fn with_id_generator(
        database_url: &str,
        id_gen: Arc<dyn IdGenerator>,
    ) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        let db = Self { pool, id_gen };
        db.migrate().await?;

        Ok(db)
    }

    /// The underlying pool, for advanced operations and tests
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Generate a fresh identifier from the injected capability
    pub(crate) fn next_id(&self) -> String {
        self.id_gen.generate()
    }

    /// Run schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_recipes().await?;
        self.migrate_favorites().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_short_uppercase_alphanumeric() {
        let id = RandomIdGenerator.generate();
        assert_eq!(id.len(), 10);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
