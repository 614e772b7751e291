use crate::auth::middleware::{CurrentUser, SESSION_USER_KEY};
use crate::error::AppError;
use crate::models::{Category, Income, SavingGoal};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    actor_name: String,
    actor_is_admin: bool,
    notice: Option<String>,
    category_count: i64,
    goal_count: i64,
    income_total: String,
    working_days: i64,
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    notice: Option<String>,
}

/// GET / - dashboard for the signed-in, login for everyone else.
pub async fn index_handler(session: Session) -> Redirect {
    match session.get::<i64>(SESSION_USER_KEY).await {
        Ok(Some(_)) => Redirect::to("/dashboard"),
        _ => Redirect::to("/login"),
    }
}

/// GET /dashboard - the authenticated landing page.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AppError> {
    let category_count = Category::count_by_user(&state.pool, actor.id).await?;
    let goal_count = SavingGoal::count_by_user(&state.pool, actor.id).await?;
    let income_total = Income::total_by_user(&state.pool, actor.id).await?;

    let notice = match query.notice.as_deref() {
        Some("admin_only") => {
            Some("Only the administrator can access that section.".to_string())
        }
        _ => None,
    };

    let template = DashboardTemplate {
        actor_name: actor.name,
        actor_is_admin: actor.is_admin,
        notice,
        category_count,
        goal_count,
        income_total: format!("{:.2}", income_total),
        working_days: actor.working_days,
    };

    Ok(template.into_response())
}
