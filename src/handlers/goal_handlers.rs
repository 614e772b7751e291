use crate::auth::middleware::CurrentUser;
use crate::error::AppError;
use crate::handlers::{parse_amount, parse_date};
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::models::user::ConfirmForm;
use crate::models::{
    CreateDepositForm, CreateGoalForm, GoalWithTotal, SavingDeposit, SavingGoal,
};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "goals/index.html")]
struct GoalsTemplate {
    actor_name: String,
    actor_is_admin: bool,
    goals: Vec<GoalDisplay>,
    error: Option<String>,
    csrf_token: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "goals/view.html")]
struct GoalDetailTemplate {
    actor_name: String,
    actor_is_admin: bool,
    goal: GoalDisplay,
    deposits: Vec<DepositDisplay>,
    error: Option<String>,
    csrf_token: String,
}

struct GoalDisplay {
    id: i64,
    name: String,
    target_amount: String,
    deadline: String,
    saved: String,
}

impl From<GoalWithTotal> for GoalDisplay {
    fn from(g: GoalWithTotal) -> Self {
        GoalDisplay {
            id: g.id,
            name: g.name,
            target_amount: format!("{:.2}", g.target_amount),
            deadline: g.deadline.unwrap_or_default(),
            saved: format!("{:.2}", g.saved),
        }
    }
}

struct DepositDisplay {
    id: i64,
    amount: String,
    date: String,
}

impl From<SavingDeposit> for DepositDisplay {
    fn from(d: SavingDeposit) -> Self {
        DepositDisplay {
            id: d.id,
            amount: format!("{:.2}", d.amount),
            date: d.date,
        }
    }
}

async fn render_goals(
    state: &AppState,
    session: &Session,
    actor: &crate::models::User,
    error: Option<String>,
) -> Result<Response, AppError> {
    let goals = SavingGoal::list_with_totals(&state.pool, actor.id).await?;

    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = GoalsTemplate {
        actor_name: actor.name.clone(),
        actor_is_admin: actor.is_admin,
        goals: goals.into_iter().map(GoalDisplay::from).collect(),
        error,
        csrf_token,
    };

    Ok(template.into_response())
}

async fn render_goal_detail(
    state: &AppState,
    session: &Session,
    actor: &crate::models::User,
    goal_id: i64,
    error: Option<String>,
) -> Result<Response, AppError> {
    let goal = SavingGoal::get_by_id_and_user(&state.pool, goal_id, actor.id)
        .await?
        .ok_or(AppError::NotFound)?;
    let deposits = SavingDeposit::list_by_goal(&state.pool, goal.id).await?;

    let saved: f64 = deposits.iter().map(|d| d.amount).sum();
    let display = GoalDisplay {
        id: goal.id,
        name: goal.name,
        target_amount: format!("{:.2}", goal.target_amount),
        deadline: goal.deadline.unwrap_or_default(),
        saved: format!("{:.2}", saved),
    };

    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = GoalDetailTemplate {
        actor_name: actor.name.clone(),
        actor_is_admin: actor.is_admin,
        goal: display,
        deposits: deposits.into_iter().map(DepositDisplay::from).collect(),
        error,
        csrf_token,
    };

    Ok(template.into_response())
}

/// GET /goals
pub async fn list_goals(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    render_goals(&state, &session, &actor, None).await
}

/// POST /goals
pub async fn create_goal_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Form(form): Form<CreateGoalForm>,
) -> Result<Response, AppError> {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return render_goals(
            &state,
            &session,
            &actor,
            Some("Invalid security token. Please refresh the page and try again.".to_string()),
        )
        .await;
    }

    let name = form.name.trim();
    if name.is_empty() {
        return render_goals(
            &state,
            &session,
            &actor,
            Some("Goal name is required".to_string()),
        )
        .await;
    }

    let target_amount = match parse_amount(&form.target_amount) {
        Ok(value) => value,
        Err(msg) => return render_goals(&state, &session, &actor, Some(msg)).await,
    };

    let deadline = form.deadline.trim();
    let deadline = if deadline.is_empty() {
        None
    } else {
        match parse_date(deadline) {
            Ok(value) => Some(value),
            Err(msg) => return render_goals(&state, &session, &actor, Some(msg)).await,
        }
    };

    SavingGoal::create(&state.pool, actor.id, name, target_amount, deadline.as_deref()).await?;

    Ok(Redirect::to("/goals").into_response())
}

/// GET /goals/{id}
pub async fn view_goal_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(goal_id): Path<i64>,
) -> Result<Response, AppError> {
    render_goal_detail(&state, &session, &actor, goal_id, None).await
}

/// POST /goals/{id}/delete - cascades to the goal's deposits.
pub async fn delete_goal_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(goal_id): Path<i64>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return Ok(Redirect::to("/goals").into_response());
    }

    if !SavingGoal::delete_by_id_and_user(&state.pool, goal_id, actor.id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to("/goals").into_response())
}

/// POST /goals/{id}/deposits
pub async fn create_deposit_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(goal_id): Path<i64>,
    Form(form): Form<CreateDepositForm>,
) -> Result<Response, AppError> {
    // Ownership check before anything else: deposits on foreign goals are 404s.
    let goal = SavingGoal::get_by_id_and_user(&state.pool, goal_id, actor.id)
        .await?
        .ok_or(AppError::NotFound)?;

    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return render_goal_detail(
            &state,
            &session,
            &actor,
            goal.id,
            Some("Invalid security token. Please refresh the page and try again.".to_string()),
        )
        .await;
    }

    let amount = match parse_amount(&form.amount) {
        Ok(value) => value,
        Err(msg) => return render_goal_detail(&state, &session, &actor, goal.id, Some(msg)).await,
    };

    let date = match parse_date(&form.date) {
        Ok(value) => value,
        Err(msg) => return render_goal_detail(&state, &session, &actor, goal.id, Some(msg)).await,
    };

    SavingDeposit::create(&state.pool, goal.id, amount, &date).await?;

    Ok(Redirect::to(&format!("/goals/{}", goal.id)).into_response())
}

/// POST /goals/{id}/deposits/{deposit_id}/delete
pub async fn delete_deposit_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path((goal_id, deposit_id)): Path<(i64, i64)>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response, AppError> {
    let goal = SavingGoal::get_by_id_and_user(&state.pool, goal_id, actor.id)
        .await?
        .ok_or(AppError::NotFound)?;

    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return Ok(Redirect::to(&format!("/goals/{}", goal.id)).into_response());
    }

    if !SavingDeposit::delete_by_id_and_goal(&state.pool, deposit_id, goal.id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to(&format!("/goals/{}", goal.id)).into_response())
}
