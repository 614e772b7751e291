use crate::models::user::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

pub const SESSION_USER_KEY: &str = "user_id";

/// The actor resolved for this request, threaded through request extensions
/// by `require_auth`. Handlers take it as `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Guard: the request must carry a session that resolves to an existing
/// user. Resolves the actor once and stores it in request extensions;
/// otherwise redirects to the login entry point. Never mutates state.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match session.get::<i64>(SESSION_USER_KEY).await {
        Ok(Some(id)) => id,
        _ => return Redirect::to("/login").into_response(),
    };

    match state.auth_service.get_user_by_id(user_id).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(_) => {
            // Stale session pointing at a deleted account
            let _ = session.flush().await;
            Redirect::to("/login").into_response()
        }
    }
}

/// Guard: the resolved actor must be the admin. Layered after `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Response {
    match request.extensions().get::<CurrentUser>() {
        Some(CurrentUser(user)) if user.is_admin => next.run(request).await,
        Some(_) => Redirect::to("/dashboard?notice=admin_only").into_response(),
        None => Redirect::to("/login").into_response(),
    }
}

/// Login and register pages bounce already-authenticated users home.
pub async fn redirect_if_authenticated(
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    if let Ok(Some(_user_id)) = session.get::<i64>(SESSION_USER_KEY).await {
        Redirect::to("/dashboard").into_response()
    } else {
        next.run(request).await
    }
}

/// Activity tracker, layered globally: every request made by an
/// authenticated user refreshes that user's last-active timestamp before the
/// handler runs. Anonymous requests pass through untouched, and a tracker
/// failure never fails the request.
pub async fn track_activity(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    if let Ok(Some(user_id)) = session.get::<i64>(SESSION_USER_KEY).await {
        let now = chrono::Utc::now().timestamp();
        if let Err(e) = state.user_repository.touch_last_active(user_id, now).await {
            tracing::warn!("failed to refresh activity for user {user_id}: {e}");
        }
    }

    next.run(request).await
}
