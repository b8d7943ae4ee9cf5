// ABOUTME: Library entry point for the larder recipe backend
// ABOUTME: Normalization, TheMealDB gateway, SQLite repositories, and services

#![deny(unsafe_code)]

//! # Larder
//!
//! A recipe management backend: users author, search, and favorite
//! recipes; a subset of content is imported from TheMealDB and cached
//! locally. The crate is a library; a transport layer (HTTP, CLI) sits on
//! top of the [`services`] module.
//!
//! ## Architecture
//!
//! - **`normalize`**: pure text pipelines turning free-text input and
//!   remote instruction blobs into ordered relational shape
//! - **`providers`**: TheMealDB gateway with read-through TTL caching;
//!   upstream failures degrade to empty results
//! - **`database`**: SQLite repositories with upsert-by-id and
//!   transactional replace-on-edit of child collections
//! - **`services`**: request validation, ownership gates, and the
//!   de-duplicated multi-source search composer
//!
//! ## Example
//!
//! ```rust,no_run
//! use larder::cache::CacheSettings;
//! use larder::database::Database;
//! use larder::errors::AppResult;
//! use larder::providers::{MealDbConfig, MealDbProvider};
//! use larder::services::{RecipeService, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let db = Database::new("sqlite::memory:").await?;
//!     let mealdb = MealDbProvider::new(MealDbConfig::default(), CacheSettings::default()).await?;
//!     let recipes = RecipeService::new(db, mealdb);
//!     let search = SearchService::new(recipes);
//!
//!     for recipe in search.search("arrabiata").await? {
//!         println!("{} ({})", recipe.title, recipe.origin);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod services;
