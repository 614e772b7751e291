use crate::auth::{
    self,
    middleware::{redirect_if_authenticated, require_admin, require_auth, track_activity},
};
use crate::config::session::SessionLayer;
use crate::handlers;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Builds the full application router. Split from `main` so integration
/// tests can drive the app with `tower::ServiceExt::oneshot`.
pub fn build_router(state: AppState, session_layer: SessionLayer) -> Router {
    let auth_pages = Router::new()
        .route(
            "/register",
            get(auth::handlers::register_page).post(auth::handlers::register_handler),
        )
        .route(
            "/login",
            get(auth::handlers::login_page).post(auth::handlers::login_handler),
        )
        .layer(middleware::from_fn(redirect_if_authenticated));

    let protected_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard_handler))
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category_handler),
        )
        .route(
            "/categories/{id}/delete",
            post(handlers::delete_category_handler),
        )
        .route(
            "/incomes",
            get(handlers::list_incomes).post(handlers::create_income_handler),
        )
        .route("/incomes/{id}/delete", post(handlers::delete_income_handler))
        .route(
            "/goals",
            get(handlers::list_goals).post(handlers::create_goal_handler),
        )
        .route("/goals/{id}", get(handlers::view_goal_handler))
        .route("/goals/{id}/delete", post(handlers::delete_goal_handler))
        .route("/goals/{id}/deposits", post(handlers::create_deposit_handler))
        .route(
            "/goals/{id}/deposits/{deposit_id}/delete",
            post(handlers::delete_deposit_handler),
        )
        .route(
            "/settings",
            get(handlers::show_settings_page).post(handlers::update_settings_handler),
        )
        .route(
            "/account/delete",
            post(auth::handlers::delete_account_handler),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // require_auth resolves the actor, require_admin checks the flag; the
    // last-added layer runs first.
    let admin_routes = Router::new()
        .route("/admin/users", get(auth::handlers::admin_users_page))
        .route(
            "/admin/delete_user/{id}",
            post(auth::handlers::admin_delete_user_handler),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/logout", get(auth::handlers::logout_handler))
        .merge(auth_pages)
        .merge(protected_routes)
        .merge(admin_routes)
        .nest_service("/static", ServeDir::new("static"))
        .layer(middleware::from_fn_with_state(state.clone(), track_activity))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
