use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::{env, str::FromStr};

/// Accepts `sqlite://path`, `sqlite:path`, or a bare filesystem path and
/// produces a canonical `sqlite://` URL.
pub fn normalize_database_url(url: &str) -> String {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    if path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{}", path)
    }
}

pub async fn create_pool() -> Result<SqlitePool, sqlx::Error> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;
    let database_url = normalize_database_url(&database_url);

    // Ensure the data directory exists
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let options = SqliteConnectOptions::from_str(&database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_path_gains_scheme() {
        assert_eq!(normalize_database_url("data/app.db"), "sqlite://data/app.db");
    }

    #[test]
    fn short_scheme_is_canonicalized() {
        assert_eq!(normalize_database_url("sqlite:data/app.db"), "sqlite://data/app.db");
    }

    #[test]
    fn full_scheme_is_unchanged() {
        assert_eq!(
            normalize_database_url("sqlite://data/app.db"),
            "sqlite://data/app.db"
        );
    }

    #[test]
    fn memory_url_is_preserved() {
        assert_eq!(normalize_database_url(":memory:"), "sqlite::memory:");
        assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    }
}
