//! Recipe endpoints: composition-validated creation, listing, and favorites.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::models::common::{Page, PageQuery};
use crate::db::models::recipe::{CreateRecipeRequest, Recipe, RecipeResponse, RecipeStoreError};
use crate::db::models::user::User;
use crate::AppState;

use super::auth::AuthUser;
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::validate_difficulty;

const MAX_TITLE_LENGTH: usize = 200;

fn validate_create_request(req: &CreateRecipeRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if req.title.trim().is_empty() {
        errors.add("title", "Title is required");
    } else if req.title.len() > MAX_TITLE_LENGTH {
        errors.add(
            "title",
            format!("Title is too long (max {MAX_TITLE_LENGTH} characters)"),
        );
    }

    if req.description.trim().is_empty() {
        errors.add("description", "Description is required");
    }

    if let Err(e) = validate_difficulty(req.difficulty) {
        errors.add("difficulty", e);
    }

    if req.ingredient_ids.is_empty() {
        errors.add("ingredient_ids", "At least one ingredient is required");
    }

    errors.finish()
}

/// Create a recipe from a list of ingredient ids, authored by the caller.
/// Any dangling ingredient reference rejects the whole recipe.
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    validate_create_request(&req)?;

    let recipe = Recipe::create_with_ingredients(&state.db, &req, user.id)
        .await
        .map_err(|e| match &e {
            RecipeStoreError::Database(db_err)
                if db_err.to_string().contains("UNIQUE constraint failed") =>
            {
                ApiError::conflict("A recipe with this title already exists")
            }
            _ => ApiError::from(e),
        })?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// List recipes with pagination
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<RecipeResponse>>, ApiError> {
    let window = query.window().map_err(ApiError::bad_request)?;

    let (recipes, total) = Recipe::page(&state.db, window).await?;
    let items = with_ingredients(&state, recipes).await?;

    Ok(Json(Page::new(window, total, items)))
}

/// Get a single recipe with its ingredient set
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = Recipe::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;

    let ingredients = Recipe::ingredients(&state.db, recipe.id).await?;
    Ok(Json(recipe.into_response(ingredients)))
}

/// Delete a recipe
pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !Recipe::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Recipe not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Mark a recipe as a favorite of the caller. Favoriting the same recipe
/// again is a no-op success.
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let (recipe, user_id) = load_favorite_pair(&state, user, id).await?;

    Recipe::add_favorite(&state.db, user_id, recipe.id).await?;

    let ingredients = Recipe::ingredients(&state.db, recipe.id).await?;
    Ok(Json(recipe.into_response(ingredients)))
}

/// Remove a recipe from the caller's favorites. Both entities must exist;
/// removing a relationship that was never there still succeeds.
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let (recipe, user_id) = load_favorite_pair(&state, user, id).await?;

    Recipe::remove_favorite(&state.db, user_id, recipe.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's favorite recipes with pagination
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<RecipeResponse>>, ApiError> {
    let window = query.window().map_err(ApiError::bad_request)?;

    let (recipes, total) = Recipe::favorites_page(&state.db, user.id, window).await?;
    let items = with_ingredients(&state, recipes).await?;

    Ok(Json(Page::new(window, total, items)))
}

/// Check both ends of a favorite relationship. The guard only proves the
/// token subject; the user row may have been deleted since issuance.
async fn load_favorite_pair(
    state: &AppState,
    user: AuthUser,
    recipe_id: i64,
) -> Result<(Recipe, i64), ApiError> {
    let recipe = Recipe::get(&state.db, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;

    let user = User::get(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok((recipe, user.id))
}

async fn with_ingredients(
    state: &AppState,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>, ApiError> {
    let mut items = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let ingredients = Recipe::ingredients(&state.db, recipe.id).await?;
        items.push(recipe.into_response(ingredients));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(difficulty: i64, ingredient_ids: Vec<i64>) -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: "Rarebit".to_string(),
            description: "Toast, then cheese".to_string(),
            difficulty,
            ingredient_ids,
        }
    }

    #[test]
    fn test_difficulty_bounds_are_inclusive() {
        assert!(validate_create_request(&request(0, vec![1])).is_ok());
        assert!(validate_create_request(&request(5, vec![1])).is_ok());

        assert!(validate_create_request(&request(6, vec![1])).is_err());
        assert!(validate_create_request(&request(-1, vec![1])).is_err());
    }

    #[test]
    fn test_empty_ingredient_list_is_rejected() {
        assert!(validate_create_request(&request(2, vec![])).is_err());
    }

    #[test]
    fn test_title_and_description_are_required() {
        let mut req = request(2, vec![1]);
        req.title = "  ".to_string();
        assert!(validate_create_request(&req).is_err());

        let mut req = request(2, vec![1]);
        req.description = String::new();
        assert!(validate_create_request(&req).is_err());

        let mut req = request(2, vec![1]);
        req.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(validate_create_request(&req).is_err());
    }
}
