use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::models::user::{ConfirmForm, LoginForm, RegisterForm, User};
use crate::services::{
    auth_service::{AuthServiceError, LoginRequest},
    user_service::{RegisterRequest, UserServiceError},
};
use crate::auth::middleware::{CurrentUser, SESSION_USER_KEY};
use crate::error::AppError;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    error: Option<String>,
    csrf_token: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: Option<String>,
    notice: Option<String>,
    csrf_token: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
struct AdminUsersTemplate {
    actor_name: String,
    actor_is_admin: bool,
    actor_id: i64,
    notice: Option<String>,
    users: Vec<UserRow>,
    csrf_token: String,
}

/// Preformatted row for the admin listing.
struct UserRow {
    id: i64,
    name: String,
    email: String,
    is_admin: bool,
    created_at: String,
    last_active_at: String,
}

impl From<User> for UserRow {
    fn from(u: User) -> Self {
        UserRow {
            id: u.id,
            name: u.name,
            email: u.email,
            is_admin: u.is_admin,
            created_at: format_ts(u.created_at),
            last_active_at: format_ts(u.last_active_at),
        }
    }
}

fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Deserialize)]
pub struct NoticeQuery {
    notice: Option<String>,
}

pub async fn register_page(session: Session) -> Html<String> {
    let csrf_token = get_or_create_csrf_token(&session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = RegisterTemplate {
        error: None,
        csrf_token,
    };
    Html(template.render().unwrap_or_else(|_| {
        "<html><body><h1>Error rendering register page</h1></body></html>".to_string()
    }))
}

async fn register_error(msg: &str, session: &Session) -> Response {
    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = RegisterTemplate {
        error: Some(msg.to_string()),
        csrf_token,
    };
    Html(
        template
            .render()
            .unwrap_or_else(|_| format!("<html><body><h1>Error: {}</h1></body></html>", msg)),
    )
    .into_response()
}

pub async fn register_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return register_error(
            "Invalid security token. Please refresh the page and try again.",
            &session,
        )
        .await;
    }

    let request = RegisterRequest {
        name: form.name,
        email: form.email,
        password: form.password,
    };

    match state.user_service.register(request).await {
        Ok(_) => Redirect::to("/login?notice=registered").into_response(),
        Err(err) => {
            let error_msg = match err {
                UserServiceError::MissingFields => "All fields are required",
                UserServiceError::EmailTaken => "An account with that email already exists",
                _ => "Registration failed. Please try again.",
            };
            register_error(error_msg, &session).await
        }
    }
}

pub async fn login_page(session: Session, Query(query): Query<NoticeQuery>) -> Html<String> {
    let csrf_token = get_or_create_csrf_token(&session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let notice = match query.notice.as_deref() {
        Some("registered") => Some("Account created. You can sign in now.".to_string()),
        Some("logged_out") => Some("You have been signed out.".to_string()),
        Some("account_deleted") => {
            Some("Your account and all of its data have been deleted.".to_string())
        }
        _ => None,
    };

    let template = LoginTemplate {
        error: None,
        notice,
        csrf_token,
    };
    Html(template.render().unwrap_or_else(|_| {
        "<html><body><h1>Error rendering login page</h1></body></html>".to_string()
    }))
}

async fn login_error(msg: &str, session: &Session) -> Response {
    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = LoginTemplate {
        error: Some(msg.to_string()),
        notice: None,
        csrf_token,
    };
    Html(
        template
            .render()
            .unwrap_or_else(|_| format!("<html><body><h1>Error: {}</h1></body></html>", msg)),
    )
    .into_response()
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return login_error(
            "Invalid security token. Please refresh the page and try again.",
            &session,
        )
        .await;
    }

    let request = LoginRequest {
        email: form.email,
        password: form.password,
    };

    match state.auth_service.authenticate(request).await {
        Ok(user) => {
            if session.insert(SESSION_USER_KEY, user.id).await.is_err() {
                return login_error("Failed to create session", &session).await;
            }
            Redirect::to("/dashboard").into_response()
        }
        Err(err) => {
            let error_msg = match err {
                AuthServiceError::InvalidCredentials => "Invalid email or password",
                _ => "An error occurred. Please try again.",
            };
            login_error(error_msg, &session).await
        }
    }
}

/// GET /logout - hard-clears the server-side session record, so a replayed
/// cookie never resolves again.
pub async fn logout_handler(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    Redirect::to("/login?notice=logged_out")
}

/// POST /account/delete - self-service deletion; owned data cascades.
pub async fn delete_account_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return Ok(Redirect::to("/settings").into_response());
    }

    state
        .user_service
        .delete_account(user.id)
        .await
        .map_err(|_| AppError::Internal)?;

    let _ = session.flush().await;
    Ok(Redirect::to("/login?notice=account_deleted").into_response())
}

/// GET /admin/users - list every account.
pub async fn admin_users_page(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, AppError> {
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(|_| AppError::Internal)?;

    let notice = match query.notice.as_deref() {
        Some("deleted") => Some("User deleted.".to_string()),
        Some("self_delete") => {
            Some("You cannot delete your own account from here.".to_string())
        }
        _ => None,
    };

    let csrf_token = get_or_create_csrf_token(&session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = AdminUsersTemplate {
        actor_name: actor.name.clone(),
        actor_is_admin: actor.is_admin,
        actor_id: actor.id,
        notice,
        users: users.into_iter().map(UserRow::from).collect(),
        csrf_token,
    };

    Ok(template.into_response())
}

/// POST /admin/delete_user/{id} - cascade-delete another account.
pub async fn admin_delete_user_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<i64>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return Ok(Redirect::to("/admin/users").into_response());
    }

    match state.user_service.admin_delete_user(actor.id, user_id).await {
        Ok(()) => Ok(Redirect::to("/admin/users?notice=deleted").into_response()),
        Err(UserServiceError::SelfDeletion) => {
            Ok(Redirect::to("/admin/users?notice=self_delete").into_response())
        }
        Err(UserServiceError::UserNotFound) => Err(AppError::NotFound),
        Err(_) => Err(AppError::Internal),
    }
}
