// ABOUTME: Multi-source search composer: local title matches merged with remote hits
// ABOUTME: Remote hits are persisted first-class; dedup by id keeps the local copy

use super::recipes::RecipeService;
use crate::errors::AppResult;
use crate::models::Recipe;
use std::collections::HashSet;
use tracing::debug;

/// Combines local repository search with remote gateway search
///
/// Remote hits are imported before merging so they become first-class
/// local recipes; the merged list is local-first and de-duplicated by
/// recipe id keeping the first occurrence, so a recipe known both locally
/// and remotely is represented by its locally-enriched copy.
#[derive(Clone)]
pub struct SearchService {
    recipes: RecipeService,
}

impl SearchService {
    /// Wire the composer to the recipe service it merges through
    #[must_use]
    pub const fn new(recipes: RecipeService) -> Self {
        Self { recipes }
    }

    /// Search local and remote sources for the query
    ///
    /// A blank query yields an empty list. Remote failure degrades to
    /// local-only results; the search itself never fails on upstream
    /// trouble.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Recipe>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // The local set is materialized before any import so a matching
        // remote hit cannot displace locally-held state in the results.
        let local = self.recipes.database().search_local(query).await?;
        let remote = self.recipes.provider().search_by_name(query).await?;

        debug!(
            query,
            local_hits = local.len(),
            remote_hits = remote.len(),
            "composing search results"
        );

        let mut seen: HashSet<String> = HashSet::with_capacity(local.len() + remote.len());
        let mut merged = Vec::with_capacity(local.len() + remote.len());

        for recipe in local {
            if seen.insert(recipe.id.clone()) {
                merged.push(recipe);
            }
        }

        for payload in remote {
            let imported = self.recipes.import_remote(&payload).await?;
            if seen.insert(imported.id.clone()) {
                merged.push(imported);
            }
        }

        Ok(merged)
    }
}
