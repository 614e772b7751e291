use crate::models::user::User;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Email already registered")]
    EmailTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Admins cannot delete their own account from the user list")]
    SelfDeletion,
    #[error("Working days must be between 1 and 31")]
    InvalidWorkingDays,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Creates an account. Emails are trimmed and lowercased before insert,
    /// so uniqueness is case-insensitive. The first account ever created is
    /// the admin; the repository decides that atomically.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, UserServiceError> {
        let name = request.name.trim();
        let email = request.email.trim().to_lowercase();
        let password = request.password.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(UserServiceError::MissingFields);
        }

        let password_hash = self.hash_password(password)?;
        let now = chrono::Utc::now().timestamp();

        match self
            .repository
            .create_user(name, &email, &password_hash, now)
            .await
        {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users().await?)
    }

    /// Self-service deletion; owned data goes with the account.
    pub async fn delete_account(&self, user_id: i64) -> Result<(), UserServiceError> {
        match self.repository.delete_user(user_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    /// Admin-path deletion. The admin path never allows self-deletion.
    pub async fn admin_delete_user(
        &self,
        actor_id: i64,
        target_id: i64,
    ) -> Result<(), UserServiceError> {
        if actor_id == target_id {
            return Err(UserServiceError::SelfDeletion);
        }

        match self.repository.delete_user(target_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn update_working_days(
        &self,
        user_id: i64,
        working_days: i64,
    ) -> Result<(), UserServiceError> {
        if !(1..=31).contains(&working_days) {
            return Err(UserServiceError::InvalidWorkingDays);
        }

        match self
            .repository
            .update_working_days(user_id, working_days)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }
}
