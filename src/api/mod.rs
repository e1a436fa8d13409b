pub mod auth;
pub mod error;
mod ingredients;
mod recipes;
mod users;
mod validation;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes that require no credentials
    let public_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(auth::login))
        .route("/ingredients", get(ingredients::list_ingredients))
        .route("/ingredients/:id", get(ingredients::get_ingredient))
        .route("/recipes", get(recipes::list_recipes))
        .route("/recipes/:id", get(recipes::get_recipe));

    // Routes behind the bearer-token guard
    let protected_routes = Router::new()
        .route("/ingredients", post(ingredients::create_ingredient))
        .route("/ingredients/:id", delete(ingredients::delete_ingredient))
        .route("/recipes", post(recipes::create_recipe))
        .route("/recipes/:id", delete(recipes::delete_recipe))
        .route(
            "/recipes/:id/favorite",
            patch(recipes::add_favorite).delete(recipes::remove_favorite),
        )
        .route("/recipes/favorites", get(recipes::list_favorites))
        .route("/users/my", get(users::current_user))
        .route("/users/:id", get(users::get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", public_routes.merge(protected_routes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
