// ABOUTME: Recipe persistence: upsert-by-id, transactional replace-on-edit, search
// ABOUTME: Child collections are always deleted then reinserted, never diffed

use super::Database;
use crate::errors::AppResult;
use crate::models::{NewRecipe, Origin, Recipe, RecipeStep};
use sqlx::{Row, Sqlite, Transaction};
use std::str::FromStr;

impl Database {
    /// Create recipe, ingredient, and step tables
    pub(super) async fn migrate_recipes(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                thumbnail TEXT,
                origin TEXT NOT NULL CHECK (origin IN ('USER', 'REMOTE')),
                user_id TEXT REFERENCES users(id) ON DELETE CASCADE,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_steps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                step_number INTEGER NOT NULL CHECK (step_number >= 1),
                description TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_user ON recipes(user_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipe_steps_recipe ON recipe_steps(recipe_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Upsert a recipe and replace both child collections in one transaction
    ///
    /// Matches by identifier, generating one when absent. A failure in any
    /// part (including a step constraint violation) rolls back the recipe
    /// field changes and the ingredient replacement from the same request.
    pub async fn save_recipe(
        &self,
        fields: &NewRecipe,
        ingredients: &[String],
        steps: &[RecipeStep],
    ) -> AppResult<Recipe> {
        let id = fields.id.clone().unwrap_or_else(|| self.next_id());

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO recipes (id, title, thumbnail, origin, user_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(id) DO UPDATE SET
                title = $2,
                thumbnail = $3,
                origin = $4,
                user_id = $5,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(&id)
        .bind(&fields.title)
        .bind(&fields.thumbnail)
        .bind(fields.origin.as_str())
        .bind(&fields.owner_id)
        .execute(&mut *tx)
        .await?;

        Self::replace_ingredients_tx(&mut tx, &id, ingredients).await?;
        Self::replace_steps_tx(&mut tx, &id, steps).await?;

        tx.commit().await?;

        self.get_recipe(&id)
            .await?
            .ok_or_else(|| crate::errors::AppError::internal("recipe vanished after save"))
    }

    /// Replace a recipe's ingredient rows in their own transaction
    pub async fn replace_ingredients(&self, recipe_id: &str, items: &[String]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::replace_ingredients_tx(&mut tx, recipe_id, items).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Replace a recipe's step rows in their own transaction
    pub async fn replace_steps(&self, recipe_id: &str, steps: &[RecipeStep]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::replace_steps_tx(&mut tx, recipe_id, steps).await?;
        tx.commit().await?;
        Ok(())
    }

    // Delete-then-insert ordering is mandatory; an insert before the delete
    // would duplicate rows. An empty list still deletes.
    async fn replace_ingredients_tx(
        tx: &mut Transaction<'_, Sqlite>,
        recipe_id: &str,
        items: &[String],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;

        for item in items {
            sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(item)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    async fn replace_steps_tx(
        tx: &mut Transaction<'_, Sqlite>,
        recipe_id: &str,
        steps: &[RecipeStep],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut **tx)
            .await?;

        for step in steps {
            sqlx::query(
                "INSERT INTO recipe_steps (recipe_id, step_number, description) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(i64::from(step.number))
            .bind(&step.description)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Fetch one recipe with children attached
    pub async fn get_recipe(&self, id: &str) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            "SELECT id, title, thumbnail, origin, user_id, created_at FROM recipes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let recipe = self.attach_children(Self::row_to_recipe(&row)?).await?;
                Ok(Some(recipe))
            }
            None => Ok(None),
        }
    }

    /// Delete a recipe and its dependents
    ///
    /// Children are deleted explicitly rather than trusting FK cascade:
    /// ingredients, steps, favorites, then the recipe row, in one
    /// transaction.
    pub async fn delete_recipe(&self, id: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM favorites WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Case-insensitive substring match on titles, newest first
    pub async fn search_local(&self, query: &str) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT id, title, thumbnail, origin, user_id, created_at
            FROM recipes
            WHERE LOWER(title) LIKE $1 ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        self.rows_to_recipes(&rows).await
    }

    /// Most recently created recipes, for the landing page
    pub async fn list_latest(&self, limit: i64) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT id, title, thumbnail, origin, user_id, created_at
            FROM recipes
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        self.rows_to_recipes(&rows).await
    }

    /// A user's own USER-origin recipes, newest first
    pub async fn list_user_recipes(&self, user_id: &str) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT id, title, thumbnail, origin, user_id, created_at
            FROM recipes
            WHERE user_id = $1 AND origin = 'USER'
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.rows_to_recipes(&rows).await
    }

    fn row_to_recipe(row: &sqlx::sqlite::SqliteRow) -> AppResult<Recipe> {
        let origin: String = row.get("origin");
        Ok(Recipe {
            id: row.get("id"),
            title: row.get("title"),
            thumbnail: row.get("thumbnail"),
            origin: Origin::from_str(&origin)?,
            owner_id: row.get("user_id"),
            created_at: row.get("created_at"),
            ingredients: Vec::new(),
            steps: Vec::new(),
        })
    }

    async fn rows_to_recipes(&self, rows: &[sqlx::sqlite::SqliteRow]) -> AppResult<Vec<Recipe>> {
        let mut recipes = Vec::with_capacity(rows.len());
        for row in rows {
            recipes.push(self.attach_children(Self::row_to_recipe(row)?).await?);
        }
        Ok(recipes)
    }

    /// Load child collections: ingredients in insertion order, steps by
    /// sequence number
    async fn attach_children(&self, mut recipe: Recipe) -> AppResult<Recipe> {
        recipe.ingredients = sqlx::query_scalar(
            "SELECT ingredient FROM recipe_ingredients WHERE recipe_id = $1 ORDER BY id",
        )
        .bind(&recipe.id)
        .fetch_all(&self.pool)
        .await?;

        let step_rows = sqlx::query(
            "SELECT step_number, description FROM recipe_steps WHERE recipe_id = $1 ORDER BY step_number",
        )
        .bind(&recipe.id)
        .fetch_all(&self.pool)
        .await?;

        recipe.steps = step_rows
            .iter()
            .map(|row| RecipeStep {
                number: row.get::<i64, _>("step_number") as u32,
                description: row.get("description"),
            })
            .collect();

        Ok(recipe)
    }
}

/// Build a LIKE pattern with wildcards escaped out of the user's query
pub(super) fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped.to_lowercase())
}
