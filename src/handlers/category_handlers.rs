use crate::auth::middleware::CurrentUser;
use crate::error::AppError;
use crate::handlers::parse_amount;
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::models::user::ConfirmForm;
use crate::models::{Category, CreateCategoryForm};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
struct CategoriesTemplate {
    actor_name: String,
    actor_is_admin: bool,
    categories: Vec<CategoryDisplay>,
    error: Option<String>,
    csrf_token: String,
}

struct CategoryDisplay {
    id: i64,
    name: String,
    monthly_target: String,
}

impl From<Category> for CategoryDisplay {
    fn from(c: Category) -> Self {
        CategoryDisplay {
            id: c.id,
            name: c.name,
            monthly_target: format!("{:.2}", c.monthly_target),
        }
    }
}

async fn render_categories(
    state: &AppState,
    session: &Session,
    actor: &crate::models::User,
    error: Option<String>,
) -> Result<Response, AppError> {
    let categories = Category::list_by_user(&state.pool, actor.id).await?;

    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = CategoriesTemplate {
        actor_name: actor.name.clone(),
        actor_is_admin: actor.is_admin,
        categories: categories.into_iter().map(CategoryDisplay::from).collect(),
        error,
        csrf_token,
    };

    Ok(template.into_response())
}

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    render_categories(&state, &session, &actor, None).await
}

/// POST /categories
pub async fn create_category_handler(
    State(state): State<AppState>,
    session: Session,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Form(form): Form<CreateCategoryForm>,
) -> Result<Response, AppError> {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return render_categories(
            &state,
            &session,
            &actor,
            Some("Invalid security token. Please refresh the page and try again.".to_string()),
        )
        .await;
    }

    let name = form.name.trim();
    if name.is_empty() {
        return render_categories(
            &state,
            &session,
            &actor,
            Some("Category name is required".to_string()),
        )
        .await;
    }

    let monthly_target = match parse_amount(&form.monthly_target) {
        Ok(value) => value,
        Err(msg) => return render_categories(&state, &session, &actor, Some(msg)).await,
    };

    Category::create(&state.pool, actor.id, name, monthly_target).await?;

    Ok(Redirect::to("/categories").into_response())
}

/// POST /categories/{id}/delete
pub async fn delete_category_handler(
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
        return Ok(Redirect::to("/categories").into_response());
    }

    if !Category::delete_by_id_and_user(&state.pool, id, actor.id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to("/categories").into_response())
}
