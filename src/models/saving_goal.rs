use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A savings goal. Owns its deposits; deleting the goal cascades to them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SavingGoal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    pub deadline: Option<String>,
}

/// Goal joined with the sum of its deposits, for list views.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GoalWithTotal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    pub deadline: Option<String>,
    pub saved: f64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SavingDeposit {
    pub id: i64,
    pub goal_id: i64,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalForm {
    pub name: String,
    pub target_amount: String,
    pub deadline: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDepositForm {
    pub amount: String,
    pub date: String,
    pub csrf_token: String,
}

impl SavingGoal {
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        name: &str,
        target_amount: f64,
        deadline: Option<&str>,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO saving_goals (user_id, name, target_amount, deadline) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(name)
        .bind(target_amount)
        .bind(deadline)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_id_and_user(
        pool: &SqlitePool,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>> {
        let goal = sqlx::query_as::<_, SavingGoal>(
            "SELECT id, user_id, name, target_amount, deadline FROM saving_goals WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(goal)
    }

    pub async fn list_with_totals(pool: &SqlitePool, user_id: i64) -> Result<Vec<GoalWithTotal>> {
        let goals = sqlx::query_as::<_, GoalWithTotal>(
            r#"
            SELECT g.id, g.user_id, g.name, g.target_amount, g.deadline,
                   COALESCE(SUM(d.amount), 0.0) AS saved
            FROM saving_goals g
            LEFT JOIN saving_deposits d ON d.goal_id = g.id
            WHERE g.user_id = ?
            GROUP BY g.id
            ORDER BY g.name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(goals)
    }

    pub async fn count_by_user(pool: &SqlitePool, user_id: i64) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM saving_goals WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count.0)
    }

    pub async fn delete_by_id_and_user(pool: &SqlitePool, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saving_goals WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl SavingDeposit {
    /// Caller must have verified goal ownership first.
    pub async fn create(pool: &SqlitePool, goal_id: i64, amount: f64, date: &str) -> Result<i64> {
        let result =
            sqlx::query("INSERT INTO saving_deposits (goal_id, amount, date) VALUES (?, ?, ?)")
                .bind(goal_id)
                .bind(amount)
                .bind(date)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn list_by_goal(pool: &SqlitePool, goal_id: i64) -> Result<Vec<Self>> {
        let deposits = sqlx::query_as::<_, SavingDeposit>(
            "SELECT id, goal_id, amount, date FROM saving_deposits WHERE goal_id = ? ORDER BY date DESC, id DESC",
        )
        .bind(goal_id)
        .fetch_all(pool)
        .await?;

        Ok(deposits)
    }

    pub async fn delete_by_id_and_goal(pool: &SqlitePool, id: i64, goal_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saving_deposits WHERE id = ? AND goal_id = ?")
            .bind(id)
            .bind(goal_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
