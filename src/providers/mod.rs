// ABOUTME: Remote recipe data providers
// ABOUTME: TheMealDB is the only upstream source today

//! # Remote Providers
//!
//! Gateways to third-party recipe sources. Each provider owns its HTTP
//! client and cache, and absorbs upstream failures: callers see empty
//! results, never transport errors.

/// TheMealDB gateway
pub mod mealdb;

pub use mealdb::{MealDbConfig, MealDbProvider, MealPayload};
