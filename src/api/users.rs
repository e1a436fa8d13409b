//! User account endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::models::user::{RegisterRequest, User, UserResponse};
use crate::AppState;

use super::auth::{self, AuthUser};
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_name, validate_password};

fn validate_register_request(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(&req.first_name, "First name") {
        errors.add("first_name", e);
    }

    if let Err(e) = validate_name(&req.last_name, "Last name") {
        errors.add("last_name", e);
    }

    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }

    if let Err(e) = validate_password(&req.password) {
        errors.add("password", e);
    }

    errors.finish()
}

/// Create a new user account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_register_request(&req)?;

    let password_hash = auth::hash_password(req.password.clone()).await?;

    let user = User::create(&state.db, &req, &password_hash)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                ApiError::conflict("A user with this email already exists")
            } else {
                ApiError::from(e)
            }
        })?;

    tracing::info!("Registered user {}", user.email);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get the authenticated user
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    lookup_user(&state, user.id).await
}

/// Get any user by id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    lookup_user(&state, id).await
}

async fn lookup_user(state: &AppState, id: i64) -> Result<Json<UserResponse>, ApiError> {
    let user = User::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Gwen".to_string(),
            last_name: "Davies".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_register_request() {
        assert!(validate_register_request(&request("gwen@example.com", "longenough")).is_ok());

        assert!(validate_register_request(&request("not-an-email", "longenough")).is_err());
        assert!(validate_register_request(&request("gwen@example.com", "short")).is_err());

        let mut req = request("gwen@example.com", "longenough");
        req.first_name = String::new();
        assert!(validate_register_request(&req).is_err());
    }
}
