// ABOUTME: Core domain models for recipes, favorites, and users
// ABOUTME: Closed enums for origin and date filters replace the original string comparisons

//! # Data Models
//!
//! Plain serializable structs shared by the repositories and services.
//! `Origin` and `DateFilter` are closed enums; their persisted string forms
//! (`USER`/`REMOTE`) round-trip through [`Origin::as_str`] and `FromStr`.

use crate::errors::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a recipe came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Origin {
    /// Authored by an application user
    User,
    /// Imported from TheMealDB
    Remote,
}

impl Origin {
    /// Persisted string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Remote => "REMOTE",
        }
    }
}

impl FromStr for Origin {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "REMOTE" => Ok(Self::Remote),
            other => Err(AppError::internal(format!(
                "unknown recipe origin '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation-date bucket for favorite filtering
///
/// Each bucket is a half-open sliding window ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    /// Last 24 hours
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Last 365 days
    Year,
}

impl DateFilter {
    /// Lower bound of the window ending at `now`
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Today => now - Duration::days(1),
            Self::Week => now - Duration::days(7),
            Self::Month => now - Duration::days(30),
            Self::Year => now - Duration::days(365),
        }
    }
}

/// A single instruction step with its authoritative 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    /// Dense sequence number starting at 1
    pub number: u32,
    /// Instruction text, free of step-label noise
    pub description: String,
}

/// A recipe with its child collections attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Short opaque identifier, at most 10 characters
    pub id: String,
    /// Display title, at most 100 characters
    pub title: String,
    /// Image URL or path
    pub thumbnail: Option<String>,
    /// USER or REMOTE
    pub origin: Origin,
    /// Owning user; None for REMOTE-origin recipes
    pub owner_id: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Free-text ingredient lines in insertion order
    pub ingredients: Vec<String>,
    /// Steps ordered by sequence number
    pub steps: Vec<RecipeStep>,
}

/// Recipe fields for an upsert; child collections travel separately
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Identifier to upsert under; None generates one
    pub id: Option<String>,
    /// Display title
    pub title: String,
    /// Image URL or path
    pub thumbnail: Option<String>,
    /// USER or REMOTE
    pub origin: Origin,
    /// Owning user for USER-origin recipes
    pub owner_id: Option<String>,
}

/// A user ↔ recipe favorite pairing, unique per pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Surrogate row id
    pub id: i64,
    /// Favoriting user
    pub user_id: String,
    /// Favorited recipe
    pub recipe_id: String,
    /// When the pair was created
    pub created_at: DateTime<Utc>,
}

/// A favorite joined with its recipe for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// The favorite row
    pub favorite: Favorite,
    /// The favorited recipe with children attached
    pub recipe: Recipe,
}

/// Optional narrowing applied to favorite listings
#[derive(Debug, Clone, Default)]
pub struct FavoriteFilter {
    /// Restrict to favorites created within this window
    pub date: Option<DateFilter>,
    /// Case-insensitive substring match on the recipe title
    pub title: Option<String>,
}

/// An application user
///
/// Auth mechanics live outside this crate; only the stored shape is owned
/// here, and the credential is always a bcrypt hash. Serialize-only: users
/// are built from database rows, never decoded from boundary input, and
/// the skipped credential field would make decoding lossy anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Short opaque identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Unique email address
    pub email: String,
    /// Bcrypt credential hash, never the clear form
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

/// User fields for an upsert
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Identifier to upsert under; None generates one
    pub id: Option<String>,
    /// Display name
    pub name: String,
    /// Email address, unique across users
    pub email: String,
    /// Clear-form password, hashed before storage
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_round_trip() {
        assert_eq!("USER".parse::<Origin>().ok(), Some(Origin::User));
        assert_eq!("REMOTE".parse::<Origin>().ok(), Some(Origin::Remote));
        assert_eq!(Origin::User.as_str(), "USER");
        assert!("API".parse::<Origin>().is_err());
    }

    #[test]
    fn test_user_serialization_hides_credential() {
        let user = User {
            id: "COOK000001".into(),
            name: "Test Cook".into(),
            email: "cook@example.com".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            created_at: Utc::now(),
        };
        let encoded = serde_json::to_value(&user).expect("user serializes");
        assert!(encoded.get("password_hash").is_none());
        assert_eq!(encoded.get("email").and_then(|v| v.as_str()), Some("cook@example.com"));
    }

    #[test]
    fn test_date_filter_windows_are_ordered() {
        let now = Utc::now();
        assert!(DateFilter::Today.cutoff(now) > DateFilter::Week.cutoff(now));
        assert!(DateFilter::Week.cutoff(now) > DateFilter::Month.cutoff(now));
        assert!(DateFilter::Month.cutoff(now) > DateFilter::Year.cutoff(now));
    }
}
