//! Ingredient catalogue endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::models::common::{Page, PageQuery};
use crate::db::models::ingredient::{CreateIngredientRequest, Ingredient};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::validate_name;

fn validate_create_request(req: &CreateIngredientRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(&req.name, "Ingredient name") {
        errors.add("name", e);
    }

    if let Err(e) = validate_name(&req.kind, "Ingredient type") {
        errors.add("type", e);
    }

    errors.finish()
}

/// Create a new ingredient
pub async fn create_ingredient(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<Ingredient>), ApiError> {
    validate_create_request(&req)?;

    let ingredient = Ingredient::create(&state.db, &req).await.map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict("An ingredient with this name already exists")
        } else {
            ApiError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// List ingredients with pagination
pub async fn list_ingredients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Ingredient>>, ApiError> {
    let window = query.window().map_err(ApiError::bad_request)?;

    let (items, total) = Ingredient::page(&state.db, window).await?;

    Ok(Json(Page::new(window, total, items)))
}

/// Get a single ingredient
pub async fn get_ingredient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Ingredient>, ApiError> {
    let ingredient = Ingredient::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Ingredient not found"))?;

    Ok(Json(ingredient))
}

/// Delete an ingredient. Fails with a conflict while any recipe still
/// references it.
pub async fn delete_ingredient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = Ingredient::delete(&state.db, id).await.map_err(|e| {
        if e.to_string().contains("FOREIGN KEY constraint failed") {
            ApiError::conflict("Ingredient is used by existing recipes")
        } else {
            ApiError::from(e)
        }
    })?;

    if !deleted {
        return Err(ApiError::not_found("Ingredient not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_create_request() {
        let req = CreateIngredientRequest {
            name: "cheddar".to_string(),
            kind: "dairy".to_string(),
        };
        assert!(validate_create_request(&req).is_ok());

        let req = CreateIngredientRequest {
            name: String::new(),
            kind: "dairy".to_string(),
        };
        assert!(validate_create_request(&req).is_err());

        let req = CreateIngredientRequest {
            name: "cheddar".to_string(),
            kind: "  ".to_string(),
        };
        assert!(validate_create_request(&req).is_err());
    }
}
