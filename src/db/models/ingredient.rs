//! Ingredient model and queries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::PageWindow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    /// Ingredient category, stored and serialized as `type`.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Ingredient {
    pub async fn create(
        db: &SqlitePool,
        req: &CreateIngredientRequest,
    ) -> Result<Ingredient, sqlx::Error> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO ingredients (name, type, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&req.kind)
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await?;

        sqlx::query_as("SELECT * FROM ingredients WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(db)
            .await
    }

    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Ingredient>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM ingredients WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// One page of ingredients plus the total row count.
    pub async fn page(
        db: &SqlitePool,
        window: PageWindow,
    ) -> Result<(Vec<Ingredient>, i64), sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
            .fetch_one(db)
            .await?;

        let items = sqlx::query_as("SELECT * FROM ingredients ORDER BY id LIMIT ? OFFSET ?")
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(db)
            .await?;

        Ok((items, total))
    }

    /// Returns whether a row was deleted.
    pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
