// ABOUTME: Favorite persistence: idempotent add/remove and the filtered dashboard listing
// ABOUTME: Listing joins each favorite with its fully loaded recipe

use super::recipes::like_pattern;
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Favorite, FavoriteEntry, FavoriteFilter};
use chrono::Utc;
use sqlx::Row;

impl Database {
    /// Create the favorites table
    pub(super) async fn migrate_favorites(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS favorites (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (user_id, recipe_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_favorites_user ON favorites(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Mark a recipe as a favorite, keeping the original row on repeats
    ///
    /// The unique pair constraint makes this idempotent: a second add
    /// returns the existing favorite with its original timestamp.
    pub async fn add_favorite(&self, user_id: &str, recipe_id: &str) -> AppResult<Favorite> {
        sqlx::query(
            r"
            INSERT INTO favorites (user_id, recipe_id)
            VALUES ($1, $2)
            ON CONFLICT(user_id, recipe_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            r"
            SELECT id, user_id, recipe_id, created_at
            FROM favorites
            WHERE user_id = $1 AND recipe_id = $2
            ",
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::row_to_favorite(&row))
    }

    /// Remove one user/recipe favorite pair; removing an absent pair is a no-op
    pub async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// A user's favorites with recipes attached, newest favorite first
    ///
    /// The date filter bounds the favorite's creation time, not the
    /// recipe's; the title filter is a case-insensitive substring match on
    /// the recipe title.
    pub async fn list_favorites(
        &self,
        user_id: &str,
        filter: &FavoriteFilter,
    ) -> AppResult<Vec<FavoriteEntry>> {
        // Formatted to match CURRENT_TIMESTAMP's stored text form so the
        // comparison stays lexicographic-safe.
        let cutoff = filter
            .date
            .map(|date| date.cutoff(Utc::now()).format("%Y-%m-%d %H:%M:%S").to_string());
        let title_pattern = filter.title.as_deref().map(like_pattern);

        let rows = sqlx::query(
            r"
            SELECT f.id, f.user_id, f.recipe_id, f.created_at
            FROM favorites f
            JOIN recipes r ON r.id = f.recipe_id
            WHERE f.user_id = $1
              AND ($2 IS NULL OR f.created_at >= $2)
              AND ($3 IS NULL OR LOWER(r.title) LIKE $3 ESCAPE '\')
            ORDER BY f.created_at DESC, f.id DESC
            ",
        )
        .bind(user_id)
        .bind(cutoff)
        .bind(title_pattern)
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let favorite = Self::row_to_favorite(row);
            let recipe = self
                .get_recipe(&favorite.recipe_id)
                .await?
                .ok_or_else(|| AppError::internal("favorite references a missing recipe"))?;
            entries.push(FavoriteEntry { favorite, recipe });
        }

        Ok(entries)
    }

    fn row_to_favorite(row: &sqlx::sqlite::SqliteRow) -> Favorite {
        Favorite {
            id: row.get("id"),
            user_id: row.get("user_id"),
            recipe_id: row.get("recipe_id"),
            created_at: row.get("created_at"),
        }
    }
}
