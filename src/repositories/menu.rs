//! Menu repository for database operations

use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::MenuItem;
use crate::pagination::PageQuery;
use crate::validation::menu_draft;

const MENU_NOT_FOUND: &str = "Menu not found.";

/// Menu repository. Menu items carry no owner, so none of these operations
/// take a user.
#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    /// Create a new menu repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a menu item after validating the payload
    pub async fn create(&self, payload: &Map<String, Value>) -> ApiResult<MenuItem> {
        let draft = menu_draft(payload, true).map_err(ApiError::Validation)?;

        info!("Creating menu item: {}", draft.name.as_deref().unwrap_or_default());

        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            INSERT INTO menu_items (name, description, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, price, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Fetch one page of menu items together with the total count
    pub async fn list(&self, query: &PageQuery) -> ApiResult<(Vec<MenuItem>, i64)> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, description, price, created_at
            FROM menu_items
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    /// Find a menu item by id
    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, name, description, price, created_at
            FROM menu_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Partially update a menu item: only the supplied fields change
    /// (merge-patch, not a full-record overwrite).
    pub async fn update(&self, id: i64, payload: &Map<String, Value>) -> ApiResult<MenuItem> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(MENU_NOT_FOUND.to_string()))?;

        let draft = menu_draft(payload, false).map_err(ApiError::Validation)?;

        let name = draft.name.unwrap_or(existing.name);
        let description = draft.description.unwrap_or(existing.description);
        let price = draft.price.unwrap_or(existing.price);

        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            UPDATE menu_items
            SET name = $1, description = $2, price = $3
            WHERE id = $4
            RETURNING id, name, description, price, created_at
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(price)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Delete a menu item by id
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(MENU_NOT_FOUND.to_string()));
        }

        info!("Deleted menu item {}", id);
        Ok(())
    }
}
