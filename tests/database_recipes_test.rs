// ABOUTME: Integration tests for the recipe repository
// ABOUTME: Covers round-trip ordering, upsert, replace-on-edit, delete, and atomicity

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{create_test_db, seed_user};
use larder::errors::AppResult;
use larder::models::{NewRecipe, Origin, RecipeStep};

const COOK: &str = "COOK000001";

fn user_recipe(id: Option<&str>, title: &str) -> NewRecipe {
    NewRecipe {
        id: id.map(ToOwned::to_owned),
        title: title.to_owned(),
        thumbnail: None,
        origin: Origin::User,
        owner_id: Some(COOK.to_owned()),
    }
}

fn steps(descriptions: &[&str]) -> Vec<RecipeStep> {
    descriptions
        .iter()
        .enumerate()
        .map(|(index, description)| RecipeStep {
            number: u32::try_from(index).unwrap() + 1,
            description: (*description).to_owned(),
        })
        .collect()
}

#[tokio::test]
async fn test_round_trip_preserves_child_ordering() -> AppResult<()> {
    let db = create_test_db().await?;
    saved_user(&db).await?;

    let ingredients: Vec<String> = vec![
        "2 cups flour".into(),
        "1 tsp salt".into(),
        "3 eggs".into(),
    ];
    let recipe_steps = steps(&["Mix dry ingredients", "Add eggs", "Bake for 15 minutes"]);

    let saved = db
        .save_recipe(&user_recipe(None, "Pancakes"), &ingredients, &recipe_steps)
        .await?;

    assert_eq!(saved.id.len(), 10);
    assert_eq!(saved.ingredients, ingredients);
    assert_eq!(saved.steps, recipe_steps);
    let numbers: Vec<u32> = saved.steps.iter().map(|step| step.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    Ok(())
}

#[tokio::test]
async fn test_upsert_overwrites_fields_in_place() -> AppResult<()> {
    let db = create_test_db().await?;
    saved_user(&db).await?;

    let first = db
        .save_recipe(
            &user_recipe(Some("RECIPE0001"), "Draft title"),
            &["water".into()],
            &steps(&["Boil"]),
        )
        .await?;
    let second = db
        .save_recipe(
            &user_recipe(Some("RECIPE0001"), "Final title"),
            &["water".into(), "salt".into()],
            &steps(&["Boil", "Season"]),
        )
        .await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.title, "Final title");
    assert_eq!(second.ingredients.len(), 2);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
        .fetch_one(db.pool())
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn test_replace_with_empty_list_still_deletes() -> AppResult<()> {
    let db = create_test_db().await?;
    saved_user(&db).await?;

    let saved = db
        .save_recipe(
            &user_recipe(None, "Toast"),
            &["bread".into()],
            &steps(&["Toast the bread"]),
        )
        .await?;

    db.replace_ingredients(&saved.id, &[]).await?;
    db.replace_steps(&saved.id, &[]).await?;

    let reread = db.get_recipe(&saved.id).await?.expect("recipe still exists");
    assert!(reread.ingredients.is_empty());
    assert!(reread.steps.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_children_and_favorites() -> AppResult<()> {
    let db = create_test_db().await?;
    saved_user(&db).await?;

    let saved = db
        .save_recipe(
            &user_recipe(None, "Soup"),
            &["stock".into()],
            &steps(&["Simmer"]),
        )
        .await?;
    db.add_favorite(COOK, &saved.id).await?;

    db.delete_recipe(&saved.id).await?;

    assert!(db.get_recipe(&saved.id).await?.is_none());
    for table in ["recipe_ingredients", "recipe_steps", "favorites"] {
        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE recipe_id = $1"))
                .bind(&saved.id)
                .fetch_one(db.pool())
                .await?;
        assert_eq!(count, 0, "{table} rows should be gone");
    }

    Ok(())
}

#[tokio::test]
async fn test_search_local_is_case_insensitive_substring() -> AppResult<()> {
    let db = create_test_db().await?;
    saved_user(&db).await?;

    db.save_recipe(
        &user_recipe(None, "Spicy Arrabiata"),
        &["penne".into()],
        &steps(&["Cook"]),
    )
    .await?;
    db.save_recipe(
        &user_recipe(None, "Pancakes"),
        &["flour".into()],
        &steps(&["Fry"]),
    )
    .await?;

    let hits = db.search_local("ARRAB").await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Spicy Arrabiata");
    assert_eq!(hits[0].owner_id.as_deref(), Some(COOK));

    assert!(db.search_local("zzz").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_search_local_treats_wildcards_literally() -> AppResult<()> {
    let db = create_test_db().await?;
    saved_user(&db).await?;

    db.save_recipe(
        &user_recipe(None, "100% Rye Bread"),
        &["rye flour".into()],
        &steps(&["Knead"]),
    )
    .await?;
    db.save_recipe(
        &user_recipe(None, "Pancakes"),
        &["flour".into()],
        &steps(&["Fry"]),
    )
    .await?;

    let hits = db.search_local("%").await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% Rye Bread");

    Ok(())
}

#[tokio::test]
async fn test_step_failure_rolls_back_ingredient_replacement() -> AppResult<()> {
    let db = create_test_db().await?;
    saved_user(&db).await?;

    let original_ingredients: Vec<String> = vec!["stock".into(), "noodles".into()];
    let saved = db
        .save_recipe(
            &user_recipe(Some("RECIPE0002"), "Ramen"),
            &original_ingredients,
            &steps(&["Boil stock", "Add noodles"]),
        )
        .await?;

    // Step number 0 violates the step_number >= 1 constraint after the
    // ingredient replacement has already run inside the same transaction.
    let bad_steps = vec![RecipeStep {
        number: 0,
        description: "Invalid".into(),
    }];
    let result = db
        .save_recipe(
            &user_recipe(Some("RECIPE0002"), "Ramen v2"),
            &["water".into()],
            &bad_steps,
        )
        .await;
    assert!(result.is_err());

    let reread = db.get_recipe(&saved.id).await?.expect("recipe survives");
    assert_eq!(reread.title, "Ramen");
    assert_eq!(reread.ingredients, original_ingredients);
    assert_eq!(reread.steps.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_list_user_recipes_excludes_remote_and_others() -> AppResult<()> {
    let db = create_test_db().await?;
    saved_user(&db).await?;
    seed_user(&db, "COOK000002", "other@example.com").await?;

    db.save_recipe(
        &user_recipe(None, "Mine"),
        &["a".into()],
        &steps(&["Do"]),
    )
    .await?;
    db.save_recipe(
        &NewRecipe {
            id: Some("52772".into()),
            title: "Imported".into(),
            thumbnail: None,
            origin: Origin::Remote,
            owner_id: None,
        },
        &[],
        &[],
    )
    .await?;
    db.save_recipe(
        &NewRecipe {
            id: None,
            title: "Someone else's".into(),
            thumbnail: None,
            origin: Origin::User,
            owner_id: Some("COOK000002".into()),
        },
        &["b".into()],
        &steps(&["Do"]),
    )
    .await?;

    let mine = db.list_user_recipes(COOK).await?;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Mine");

    let latest = db.list_latest(10).await?;
    assert_eq!(latest.len(), 3);

    Ok(())
}

async fn saved_user(db: &larder::database::Database) -> AppResult<()> {
    seed_user(db, COOK, "cook@example.com").await
}
