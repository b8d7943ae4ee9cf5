// ABOUTME: Recipe authoring, remote import, favorites, dashboard, and registration
// ABOUTME: Only USER-origin recipes owned by the requester may be edited or deleted

use crate::database::Database;
use crate::errors::{AppError, AppResult, FieldErrors};
use crate::models::{
    Favorite, FavoriteEntry, FavoriteFilter, NewRecipe, NewUser, Origin, Recipe, User,
};
use crate::normalize::{clean_instructions, ensure_list, number_steps, parse_lines, tidy_lines};
use crate::providers::{MealDbProvider, MealPayload};
use serde::Deserialize;
use tracing::info;

/// Upper bound on recipe title length, in characters
const MAX_TITLE_CHARS: usize = 100;
/// Lower bound on password length, in characters
const MIN_PASSWORD_CHARS: usize = 8;

/// Multi-line text that may arrive as one blob or as an already-split list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLines {
    /// One raw blob, split on newlines during normalization
    Text(String),
    /// Pre-split lines, re-trimmed during normalization
    List(Vec<String>),
}

impl RawLines {
    /// Ordered non-empty trimmed lines, regardless of input shape
    #[must_use]
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Text(blob) => parse_lines(Some(blob)),
            Self::List(lines) => tidy_lines(lines),
        }
    }
}

/// Fields for creating a user-authored recipe
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    /// Display title, required, at most 100 characters
    pub title: String,
    /// Ingredient lines; required to be non-empty after normalization
    pub ingredients: Option<RawLines>,
    /// Step lines; required to be non-empty after normalization
    pub steps: Option<RawLines>,
    /// Image URL or path
    pub thumbnail: Option<String>,
}

/// Fields for editing a user-authored recipe
///
/// An absent thumbnail keeps the stored one; the other fields are
/// validated exactly as on create.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecipeRequest {
    /// Replacement title
    pub title: String,
    /// Replacement ingredient lines
    pub ingredients: Option<RawLines>,
    /// Replacement step lines
    pub steps: Option<RawLines>,
    /// Replacement image, or None to keep the stored one
    pub thumbnail: Option<String>,
}

/// Fields for registering a user
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    /// Display name, required
    pub name: String,
    /// Email address, required and unique
    pub email: String,
    /// Clear-form password, at least 8 characters
    pub password: String,
}

/// A user's dashboard: their favorites and their own authored recipes
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Favorites after filtering, newest first
    pub favorites: Vec<FavoriteEntry>,
    /// The user's USER-origin recipes, newest first
    pub own_recipes: Vec<Recipe>,
}

/// Recipe operations behind validation and ownership gates
#[derive(Clone)]
pub struct RecipeService {
    db: Database,
    mealdb: MealDbProvider,
}

impl RecipeService {
    /// Wire the service to its repository and remote gateway
    #[must_use]
    pub const fn new(db: Database, mealdb: MealDbProvider) -> Self {
        Self { db, mealdb }
    }

    /// The underlying repository handle
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// The remote gateway
    #[must_use]
    pub const fn provider(&self) -> &MealDbProvider {
        &self.mealdb
    }

    /// Create a user-authored recipe
    pub async fn create_recipe(
        &self,
        user_id: &str,
        request: &CreateRecipeRequest,
    ) -> AppResult<Recipe> {
        let title = validate_title(&request.title)?;
        let ingredients = normalize_required(request.ingredients.as_ref(), "ingredients")?;
        let steps = number_steps(normalize_required(request.steps.as_ref(), "steps")?);

        let recipe = self
            .db
            .save_recipe(
                &NewRecipe {
                    id: None,
                    title,
                    thumbnail: request.thumbnail.clone(),
                    origin: Origin::User,
                    owner_id: Some(user_id.to_owned()),
                },
                &ingredients,
                &steps,
            )
            .await?;

        info!(recipe_id = %recipe.id, user_id, "recipe created");
        Ok(recipe)
    }

    /// Edit a user-authored recipe, replacing both child collections
    pub async fn update_recipe(
        &self,
        user_id: &str,
        recipe_id: &str,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Recipe> {
        let existing = self.owned_recipe(user_id, recipe_id).await?;

        let title = validate_title(&request.title)?;
        let ingredients = normalize_required(request.ingredients.as_ref(), "ingredients")?;
        let steps = number_steps(normalize_required(request.steps.as_ref(), "steps")?);
        let thumbnail = request.thumbnail.clone().or(existing.thumbnail);

        let recipe = self
            .db
            .save_recipe(
                &NewRecipe {
                    id: Some(existing.id),
                    title,
                    thumbnail,
                    origin: Origin::User,
                    owner_id: Some(user_id.to_owned()),
                },
                &ingredients,
                &steps,
            )
            .await?;

        info!(recipe_id = %recipe.id, user_id, "recipe updated");
        Ok(recipe)
    }

    /// Delete a user-authored recipe and its dependents
    pub async fn delete_recipe(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        let existing = self.owned_recipe(user_id, recipe_id).await?;
        self.db.delete_recipe(&existing.id).await?;
        info!(recipe_id, user_id, "recipe deleted");
        Ok(())
    }

    /// Fetch one recipe with children attached
    pub async fn get_recipe(&self, recipe_id: &str) -> AppResult<Option<Recipe>> {
        self.db.get_recipe(recipe_id).await
    }

    /// Persist a remote payload as a REMOTE-origin ownerless recipe
    ///
    /// The remote id is kept, so a re-import refreshes the stored copy in
    /// place. Remote payloads skip the non-empty list validation; a payload
    /// without usable ingredients or steps simply stores empty collections.
    pub async fn import_remote(&self, payload: &MealPayload) -> AppResult<Recipe> {
        let ingredients = payload.ingredient_lines();
        let steps = clean_instructions(payload.instructions.as_deref());

        self.db
            .save_recipe(
                &NewRecipe {
                    id: Some(payload.id.clone()),
                    title: payload.title.clone(),
                    thumbnail: payload.thumbnail.clone(),
                    origin: Origin::Remote,
                    owner_id: None,
                },
                &ingredients,
                &steps,
            )
            .await
    }

    /// Look up a meal upstream and import it
    pub async fn fetch_remote_recipe(&self, remote_id: &str) -> AppResult<Option<Recipe>> {
        match self.mealdb.fetch_by_id(remote_id).await? {
            Some(payload) => Ok(Some(self.import_remote(&payload).await?)),
            None => Ok(None),
        }
    }

    /// Import a random upstream meal; upstream failure yields None
    pub async fn random_recipe(&self) -> AppResult<Option<Recipe>> {
        match self.mealdb.fetch_random().await? {
            Some(payload) => Ok(Some(self.import_remote(&payload).await?)),
            None => Ok(None),
        }
    }

    /// Most recently created recipes, for the landing page
    pub async fn latest_recipes(&self, limit: i64) -> AppResult<Vec<Recipe>> {
        self.db.list_latest(limit).await
    }

    /// Mark a recipe as a favorite; repeats return the existing row
    pub async fn add_favorite(&self, user_id: &str, recipe_id: &str) -> AppResult<Favorite> {
        if self.db.get_recipe(recipe_id).await?.is_none() {
            return Err(AppError::validation("recipe_id", "Unknown recipe."));
        }
        self.db.add_favorite(user_id, recipe_id).await
    }

    /// Remove a favorite pair; an absent pair is a no-op
    pub async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        self.db.remove_favorite(user_id, recipe_id).await
    }

    /// Filtered favorites plus the user's own recipes
    pub async fn dashboard(&self, user_id: &str, filter: &FavoriteFilter) -> AppResult<Dashboard> {
        let favorites = self.db.list_favorites(user_id, filter).await?;
        let own_recipes = self.db.list_user_recipes(user_id).await?;
        Ok(Dashboard {
            favorites,
            own_recipes,
        })
    }

    /// Register a user, collecting every field problem into one error
    pub async fn register_user(&self, request: &RegisterUserRequest) -> AppResult<User> {
        let mut problems = FieldErrors::new();
        if request.name.trim().is_empty() {
            problems.insert("name".into(), "Please provide a name.".into());
        }
        let email = request.email.trim();
        if email.is_empty() || !email.contains('@') {
            problems.insert(
                "email".into(),
                "Please provide a valid email address.".into(),
            );
        }
        if request.password.chars().count() < MIN_PASSWORD_CHARS {
            problems.insert(
                "password".into(),
                "Password must be at least 8 characters.".into(),
            );
        }
        if !problems.is_empty() {
            return Err(AppError::Validation(problems));
        }

        let user = self
            .db
            .upsert_user(&NewUser {
                id: None,
                name: request.name.trim().to_owned(),
                email: email.to_owned(),
                password: request.password.clone(),
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Load a recipe and require it to be editable by this user
    ///
    /// Missing id is NotFound; an existing recipe that is REMOTE-origin or
    /// owned by someone else is Forbidden, keeping the two outcomes
    /// distinguishable at the transport boundary.
    async fn owned_recipe(&self, user_id: &str, recipe_id: &str) -> AppResult<Recipe> {
        let recipe = self
            .db
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;

        if recipe.origin != Origin::User {
            return Err(AppError::forbidden("imported recipes cannot be modified"));
        }
        if recipe.owner_id.as_deref() != Some(user_id) {
            return Err(AppError::forbidden(
                "only the owner may modify this recipe",
            ));
        }

        Ok(recipe)
    }
}

/// Trim and bound the title, as a field-scoped validation
fn validate_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("title", "Please provide a title."));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::validation(
            "title",
            "Title must be 100 characters or fewer.",
        ));
    }
    Ok(trimmed.to_owned())
}

/// Normalize an optional lines field and require a non-empty result
fn normalize_required(lines: Option<&RawLines>, field: &str) -> AppResult<Vec<String>> {
    let normalized = lines.map(RawLines::normalize).unwrap_or_default();
    ensure_list(&normalized, field)?;
    Ok(normalized)
}
