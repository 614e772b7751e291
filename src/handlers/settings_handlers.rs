use crate::auth::middleware::CurrentUser;
use crate::error::AppError;
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::models::user::SettingsForm;
use crate::services::user_service::UserServiceError;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Form, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "settings.html")]
struct SettingsTemplate {
    actor_name: String,
    actor_is_admin: bool,
    working_days: i64,
    notice: Option<String>,
    error: Option<String>,
    csrf_token: String,
}

#[derive(Deserialize)]
pub struct SettingsQuery {
    notice: Option<String>,
}

async fn render_settings(
    session: &Session,
    actor: &crate::models::User,
    working_days: i64,
    notice: Option<String>,
    error: Option<String>,
) -> Response {
    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = SettingsTemplate {
        actor_name: actor.name.clone(),
        actor_is_admin: actor.is_admin,
        working_days,
        notice,
        error,
        csrf_token,
    };

    template.into_response()
}

/// GET /settings
pub async fn show_settings_page(
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Query(query): Query<SettingsQuery>,
) -> Response {
    let notice = match query.notice.as_deref() {
        Some("saved") => Some("Settings saved.".to_string()),
        _ => None,
    };

    render_settings(&session, &actor, actor.working_days, notice, None).await
}

/// POST /settings - update the working-days-per-month setting.
pub async fn update_settings_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Form(form): Form<SettingsForm>,
) -> Result<Response, AppError> {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return Ok(render_settings(
            &session,
            &actor,
            actor.working_days,
            None,
            Some("Invalid security token. Please refresh the page and try again.".to_string()),
        )
        .await);
    }

    let working_days = match form.working_days.trim().parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            return Ok(render_settings(
                &session,
                &actor,
                actor.working_days,
                None,
                Some("Working days must be a whole number".to_string()),
            )
            .await);
        }
    };

    match state
        .user_service
        .update_working_days(actor.id, working_days)
        .await
    {
        Ok(()) => Ok(Redirect::to("/settings?notice=saved").into_response()),
        Err(UserServiceError::InvalidWorkingDays) => Ok(render_settings(
            &session,
            &actor,
            actor.working_days,
            None,
            Some("Working days must be between 1 and 31".to_string()),
        )
        .await),
        Err(_) => Err(AppError::Internal),
    }
}
