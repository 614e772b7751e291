use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::repositories::user_repository::RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Verifies credentials and stamps the login. An unknown email and a bad
    /// password are indistinguishable to the caller.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let email = request.email.trim().to_lowercase();

        let mut user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !self.verify_password(&request.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let now = chrono::Utc::now().timestamp();
        self.user_repository.record_login(user.id, now).await?;
        user.last_login_at = now;
        user.last_active_at = now;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User, AuthServiceError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
            Argon2::default()
                .verify_password(password.trim().as_bytes(), &parsed_hash)
                .is_ok()
        } else {
            false
        }
    }
}
