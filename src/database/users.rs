// ABOUTME: User persistence: upsert-by-id with email uniqueness and bcrypt hashing
// ABOUTME: Plain-text passwords never reach a table

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User};
use sqlx::Row;

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Upsert a user, hashing the password before it touches storage
    ///
    /// Matches by identifier, generating one when absent. The email must
    /// not belong to a different user; that surfaces as a field-level
    /// validation error rather than a raw constraint violation.
    pub async fn upsert_user(&self, fields: &NewUser) -> AppResult<User> {
        let id = fields.id.clone().unwrap_or_else(|| self.next_id());

        let holder: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
                .bind(&fields.email)
                .fetch_optional(&self.pool)
                .await?;
        if holder.is_some_and(|existing| existing != id) {
            return Err(AppError::validation("email", "Email is already in use."));
        }

        let password_hash = bcrypt::hash(&fields.password, bcrypt::DEFAULT_COST)?;

        sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(id) DO UPDATE SET
                name = $2,
                email = $3,
                password_hash = $4
            ",
        )
        .bind(&id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&password_hash)
        .execute(&self.pool)
        .await?;

        self.get_user(&id)
            .await?
            .ok_or_else(|| AppError::internal("user vanished after save"))
    }

    /// Fetch one user by id
    pub async fn get_user(&self, id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::row_to_user))
    }

    /// Fetch one user by email, for credential checks
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::row_to_user))
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
        User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }
    }
}
