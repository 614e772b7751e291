pub mod test_helpers {
    use sqlx::{
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
        SqlitePool,
    };
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when you need to test features that don't work with in-memory databases
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a test user with a hashed password. Mirrors the repository's
    /// atomic admin rule: the first row inserted becomes the admin.
    pub async fn insert_test_user(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
            })?
            .to_string();

        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO users
                (name, email, password_hash, is_admin, working_days,
                 created_at, last_login_at, last_active_at)
            VALUES (?, ?, ?, NOT EXISTS (SELECT 1 FROM users), 26, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Rewind a user's activity clock (for reaper tests).
    pub async fn set_last_active(
        pool: &SqlitePool,
        user_id: i64,
        last_active_at: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_active_at = ? WHERE id = ?")
            .bind(last_active_at)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn insert_test_category(
        pool: &SqlitePool,
        user_id: i64,
        name: &str,
        monthly_target: f64,
    ) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO categories (user_id, name, monthly_target) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(name)
                .bind(monthly_target)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn insert_test_income(
        pool: &SqlitePool,
        user_id: i64,
        amount: f64,
        date: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO incomes (user_id, amount, date) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(amount)
            .bind(date)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn insert_test_goal(
        pool: &SqlitePool,
        user_id: i64,
        name: &str,
        target_amount: f64,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO saving_goals (user_id, name, target_amount) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(name)
        .bind(target_amount)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn insert_test_deposit(
        pool: &SqlitePool,
        goal_id: i64,
        amount: f64,
        date: &str,
    ) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO saving_deposits (goal_id, amount, date) VALUES (?, ?, ?)")
                .bind(goal_id)
                .bind(amount)
                .bind(date)
                .execute(pool)
                .await?;

        Ok(result.last_insert_rowid())
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
