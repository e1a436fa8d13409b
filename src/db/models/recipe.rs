//! Recipe model, composition-validated creation, and favorite management.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use thiserror::Error;

use super::common::PageWindow;
use super::ingredient::Ingredient;

#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: i64,
    pub author_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Recipe shape returned by the API, including the resolved ingredient set.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: i64,
    pub ingredients: Vec<Ingredient>,
    pub author_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: String,
    pub difficulty: i64,
    pub ingredient_ids: Vec<i64>,
}

#[derive(Error, Debug)]
pub enum RecipeStoreError {
    /// At least one requested ingredient id has no matching record.
    #[error("missing ingredient in the database, recipe not acceptable")]
    MissingIngredients,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl Recipe {
    /// Create a recipe from a caller-supplied ingredient id list.
    ///
    /// The ingredient set is resolved in one batch and the recipe plus its
    /// join rows are written in the same transaction: either every id
    /// resolves and the whole composite is persisted, or nothing is.
    pub async fn create_with_ingredients(
        db: &SqlitePool,
        req: &CreateRecipeRequest,
        author_id: i64,
    ) -> Result<RecipeResponse, RecipeStoreError> {
        let mut tx = db.begin().await?;

        let ingredients = resolve_ingredients(&mut tx, &req.ingredient_ids).await?;
        if ingredients.len() != req.ingredient_ids.len() {
            // Dropping the transaction rolls it back.
            return Err(RecipeStoreError::MissingIngredients);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO recipes (title, description, difficulty, author_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.difficulty)
        .bind(author_id)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let recipe_id = result.last_insert_rowid();

        for ingredient in &ingredients {
            sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES (?, ?)")
                .bind(recipe_id)
                .bind(ingredient.id)
                .execute(&mut *tx)
                .await?;
        }

        let recipe: Recipe = sqlx::query_as("SELECT * FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(recipe.into_response(ingredients))
    }

    pub fn into_response(self, ingredients: Vec<Ingredient>) -> RecipeResponse {
        RecipeResponse {
            id: self.id,
            title: self.title,
            description: self.description,
            difficulty: self.difficulty,
            ingredients,
            author_id: self.author_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Recipe>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM recipes WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// The ingredient set of a persisted recipe.
    pub async fn ingredients(
        db: &SqlitePool,
        recipe_id: i64,
    ) -> Result<Vec<Ingredient>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT i.* FROM ingredients i
            JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
            WHERE ri.recipe_id = ?
            ORDER BY i.id
            "#,
        )
        .bind(recipe_id)
        .fetch_all(db)
        .await
    }

    /// One page of recipes plus the total row count.
    pub async fn page(
        db: &SqlitePool,
        window: PageWindow,
    ) -> Result<(Vec<Recipe>, i64), sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
            .fetch_one(db)
            .await?;

        let items = sqlx::query_as("SELECT * FROM recipes ORDER BY id LIMIT ? OFFSET ?")
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(db)
            .await?;

        Ok((items, total))
    }

    /// Returns whether a row was deleted. Join rows and favorite markers
    /// cascade with the recipe.
    pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a recipe as a favorite of a user. Adding an existing favorite is
    /// a no-op.
    pub async fn add_favorite(
        db: &SqlitePool,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<(), sqlx::Error> {
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT OR IGNORE INTO recipe_favorites (user_id, recipe_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(&now)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Remove a favorite marker. Returns whether one existed.
    pub async fn remove_favorite(
        db: &SqlitePool,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipe_favorites WHERE user_id = ? AND recipe_id = ?")
            .bind(user_id)
            .bind(recipe_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of the recipes a user has favorited, plus the total count.
    pub async fn favorites_page(
        db: &SqlitePool,
        user_id: i64,
        window: PageWindow,
    ) -> Result<(Vec<Recipe>, i64), sqlx::Error> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM recipe_favorites WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(db)
                .await?;

        let items = sqlx::query_as(
            r#"
            SELECT r.* FROM recipes r
            JOIN recipe_favorites f ON f.recipe_id = r.id
            WHERE f.user_id = ?
            ORDER BY r.id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(db)
        .await?;

        Ok((items, total))
    }
}

/// Batch-resolve ingredient ids inside the creation transaction.
async fn resolve_ingredients(
    tx: &mut Transaction<'_, Sqlite>,
    ids: &[i64],
) -> Result<Vec<Ingredient>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT * FROM ingredients WHERE id IN ({placeholders}) ORDER BY id");

    let mut query = sqlx::query_as::<_, Ingredient>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    query.fetch_all(&mut **tx).await
}
