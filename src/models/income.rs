use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A single income record. `date` is an ISO `YYYY-MM-DD` string.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateIncomeForm {
    pub amount: String,
    pub date: String,
    pub csrf_token: String,
}

impl Income {
    pub async fn create(pool: &SqlitePool, user_id: i64, amount: f64, date: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO incomes (user_id, amount, date) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(amount)
            .bind(date)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>> {
        let incomes = sqlx::query_as::<_, Income>(
            "SELECT id, user_id, amount, date FROM incomes WHERE user_id = ? ORDER BY date DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(incomes)
    }

    pub async fn total_by_user(pool: &SqlitePool, user_id: i64) -> Result<f64> {
        let total: (f64,) =
            sqlx::query_as("SELECT COALESCE(SUM(amount), 0.0) FROM incomes WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(total.0)
    }

    pub async fn delete_by_id_and_user(pool: &SqlitePool, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
