use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, warn};
use uuid::Uuid;

pub const CSRF_TOKEN_KEY: &str = "csrf_token";

/// CSRF token stored in the session and embedded in every form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfToken {
    pub value: String,
    pub created_at: i64,
}

impl CsrfToken {
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Check if token is expired (24 hours)
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now - self.created_at > 86400
    }
}

impl Default for CsrfToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a new CSRF token and store in session
pub async fn generate_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let token = CsrfToken::new();
    let value = token.value.clone();

    session.insert(CSRF_TOKEN_KEY, token).await?;

    debug!("Generated new CSRF token: {}", &value[..8]);
    Ok(value)
}

/// Get or create a CSRF token for the session
pub async fn get_or_create_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let token: Option<CsrfToken> = session.get(CSRF_TOKEN_KEY).await?;

    match token {
        Some(existing_token) if !existing_token.is_expired() => Ok(existing_token.value),
        _ => generate_csrf_token(session).await,
    }
}

/// Validate a token submitted through a form field. Rotates the token on
/// success (replay protection).
pub async fn validate_csrf_form_field(
    session: &Session,
    form_token: &str,
) -> Result<(), StatusCode> {
    let stored_token: Option<CsrfToken> = session.get(CSRF_TOKEN_KEY).await.map_err(|e| {
        warn!("Failed to get CSRF token from session: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let stored_token = match stored_token {
        Some(token) => {
            if token.is_expired() {
                warn!("CSRF token expired during form validation");
                return Err(StatusCode::FORBIDDEN);
            }
            token
        }
        None => {
            warn!("No CSRF token in session for form validation");
            return Err(StatusCode::FORBIDDEN);
        }
    };

    if form_token != stored_token.value {
        warn!("CSRF form token mismatch");
        return Err(StatusCode::FORBIDDEN);
    }

    let _ = generate_csrf_token(session).await;

    Ok(())
}
