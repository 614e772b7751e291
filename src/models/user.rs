use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account. Timestamps are unix seconds; `last_active_at` is
/// refreshed by the activity tracker and drives the inactivity reaper.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub working_days: i64,
    pub created_at: i64,
    pub last_login_at: i64,
    pub last_active_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub working_days: String,
    pub csrf_token: String,
}

/// Confirmation-only POST body (delete buttons carry just the CSRF token).
#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    pub csrf_token: String,
}
