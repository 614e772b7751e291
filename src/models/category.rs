use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A spending category with a monthly target amount.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub monthly_target: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryForm {
    pub name: String,
    pub monthly_target: String,
    pub csrf_token: String,
}

impl Category {
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        name: &str,
        monthly_target: f64,
    ) -> Result<i64> {
        let result =
            sqlx::query("INSERT INTO categories (user_id, name, monthly_target) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(name)
                .bind(monthly_target)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, user_id, name, monthly_target FROM categories WHERE user_id = ? ORDER BY name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    pub async fn count_by_user(pool: &SqlitePool, user_id: i64) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM categories WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count.0)
    }

    /// Deletes only when the category belongs to `user_id`; returns whether a
    /// row was removed.
    pub async fn delete_by_id_and_user(pool: &SqlitePool, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
