use crate::models::user::User;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub const DEFAULT_WORKING_DAYS: i64 = 26;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("User not found")]
    NotFound,
    #[error("User already exists")]
    AlreadyExists,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. The admin flag is decided inside the INSERT itself
    /// (first row ever wins), so concurrent registrations cannot both become
    /// admin.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        now: i64,
    ) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    /// Sets both last_login_at and last_active_at.
    async fn record_login(&self, id: i64, now: i64) -> RepositoryResult<()>;
    async fn touch_last_active(&self, id: i64, now: i64) -> RepositoryResult<()>;
    async fn update_working_days(&self, id: i64, working_days: i64) -> RepositoryResult<()>;
    async fn delete_user(&self, id: i64) -> RepositoryResult<()>;
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;
    /// Deletes every user whose last_active_at is strictly before `cutoff`.
    /// Returns the number of users removed.
    async fn delete_inactive_before(&self, cutoff: i64) -> RepositoryResult<u64>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, is_admin, working_days, \
     created_at, last_login_at, last_active_at";

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        now: i64,
    ) -> RepositoryResult<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users
                (name, email, password_hash, is_admin, working_days,
                 created_at, last_login_at, last_active_at)
            VALUES (?, ?, ?, NOT EXISTS (SELECT 1 FROM users), ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(DEFAULT_WORKING_DAYS)
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(res) => {
                let id = res.last_insert_rowid();
                self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
            }
            Err(e) => {
                if e.to_string().contains("UNIQUE") {
                    Err(RepositoryError::AlreadyExists)
                } else {
                    Err(RepositoryError::Database(e))
                }
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn record_login(&self, id: i64, now: i64) -> RepositoryResult<()> {
        let result =
            sqlx::query("UPDATE users SET last_login_at = ?, last_active_at = ? WHERE id = ?")
                .bind(now)
                .bind(now)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn touch_last_active(&self, id: i64, now: i64) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET last_active_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn update_working_days(&self, id: i64, working_days: i64) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET working_days = ? WHERE id = ?")
            .bind(working_days)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_user(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete_inactive_before(&self, cutoff: i64) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE last_active_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
