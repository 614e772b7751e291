use crate::auth::middleware::CurrentUser;
use crate::error::AppError;
use crate::handlers::{parse_amount, parse_date};
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::models::user::ConfirmForm;
use crate::models::{CreateIncomeForm, Income};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "incomes/index.html")]
struct IncomesTemplate {
    actor_name: String,
    actor_is_admin: bool,
    incomes: Vec<IncomeDisplay>,
    total: String,
    error: Option<String>,
    csrf_token: String,
}

struct IncomeDisplay {
    id: i64,
    amount: String,
    date: String,
}

impl From<Income> for IncomeDisplay {
    fn from(i: Income) -> Self {
        IncomeDisplay {
            id: i.id,
            amount: format!("{:.2}", i.amount),
            date: i.date,
        }
    }
}

async fn render_incomes(
    state: &AppState,
    session: &Session,
    actor: &crate::models::User,
    error: Option<String>,
) -> Result<Response, AppError> {
    let incomes = Income::list_by_user(&state.pool, actor.id).await?;
    let total = Income::total_by_user(&state.pool, actor.id).await?;

    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = IncomesTemplate {
        actor_name: actor.name.clone(),
        actor_is_admin: actor.is_admin,
        incomes: incomes.into_iter().map(IncomeDisplay::from).collect(),
        total: format!("{:.2}", total),
        error,
        csrf_token,
    };

    Ok(template.into_response())
}

/// GET /incomes
pub async fn list_incomes(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    render_incomes(&state, &session, &actor, None).await
}

/// POST /incomes
pub async fn create_income_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Form(form): Form<CreateIncomeForm>,
) -> Result<Response, AppError> {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return render_incomes(
            &state,
            &session,
            &actor,
            Some("Invalid security token. Please refresh the page and try again.".to_string()),
        )
        .await;
    }

    let amount = match parse_amount(&form.amount) {
        Ok(value) => value,
        Err(msg) => return render_incomes(&state, &session, &actor, Some(msg)).await,
    };

    let date = match parse_date(&form.date) {
        Ok(value) => value,
        Err(msg) => return render_incomes(&state, &session, &actor, Some(msg)).await,
    };

    Income::create(&state.pool, actor.id, amount, &date).await?;

    Ok(Redirect::to("/incomes").into_response())
}

/// POST /incomes/{id}/delete
pub async fn delete_income_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return Ok(Redirect::to("/incomes").into_response());
    }

    if !Income::delete_by_id_and_user(&state.pool, id, actor.id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to("/incomes").into_response())
}
