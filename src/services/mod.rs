// ABOUTME: Service layer: request validation, authorization gates, and composition
// ABOUTME: Transport adapters call these; they never reach the repositories directly

//! # Services
//!
//! The operations a transport layer exposes: recipe authoring with
//! ownership checks, remote imports, favorites, dashboards, and the
//! multi-source search composer. Requests arrive as explicit structs and
//! are validated before any write begins; authorization failures surface
//! as [`crate::errors::AppError::Forbidden`] with no partial effect.

pub mod recipes;
pub mod search;

pub use recipes::{
    CreateRecipeRequest, Dashboard, RawLines, RecipeService, RegisterUserRequest,
    UpdateRecipeRequest,
};
pub use search::SearchService;
