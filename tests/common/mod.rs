#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use fintrack::{
    config::session::SessionConfig,
    repositories::SqliteUserRepository,
    router::build_router,
    services::{AuthService, UserService},
    test_utils::test_helpers,
    AppState,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;
use tower_sessions_sqlx_store::SqliteStore;

/// Builds the full application against a fresh in-memory database.
pub async fn spawn_app() -> (Router, SqlitePool) {
    let pool = test_helpers::create_test_db().await.expect("test db");

    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let state = AppState {
        user_service: Arc::new(UserService::new(user_repository.clone())),
        auth_service: Arc::new(AuthService::new(user_repository.clone())),
        user_repository,
        pool: pool.clone(),
    };

    let session_store = SqliteStore::new(pool.clone())
        .with_table_name("sessions")
        .expect("valid session table name");
    session_store.migrate().await.expect("session table migration");

    let session_layer = SessionConfig::from_env().create_layer(session_store);

    (build_router(state, session_layer), pool)
}

pub async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).expect("request to build"))
        .await
        .expect("router to respond")
}

pub async fn post_form(
    app: &Router,
    path: &str,
    cookie: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(
            builder
                .body(Body::from(body.to_string()))
                .expect("request to build"),
        )
        .await
        .expect("router to respond")
}

/// The `name=value` pair of the session cookie issued by a response.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|raw| raw.split(';').next().unwrap_or("").to_string())
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body to collect");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Pull the CSRF token out of a rendered form.
pub fn extract_csrf_token(html: &str) -> String {
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker).expect("csrf token in page") + marker.len();
    let end = html[start..].find('"').expect("closing quote") + start;
    html[start..end].to_string()
}

/// Fetch a page with the given cookie and return a fresh CSRF token from it.
/// Tokens rotate on use, so every POST needs a new one.
pub async fn csrf_from(app: &Router, path: &str, cookie: &str) -> String {
    let page = get(app, path, Some(cookie)).await;
    let html = body_string(page).await;
    extract_csrf_token(&html)
}

/// GET /register for a token, then POST the registration form.
pub async fn register(app: &Router, name: &str, email: &str, password: &str) -> Response<Body> {
    let page = get(app, "/register", None).await;
    let cookie = session_cookie(&page).expect("session cookie on register page");
    let html = body_string(page).await;
    let token = extract_csrf_token(&html);

    let body = format!("name={name}&email={email}&password={password}&csrf_token={token}");
    post_form(app, "/register", Some(&cookie), &body).await
}

/// Full login flow; returns the authenticated session cookie.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let page = get(app, "/login", None).await;
    let cookie = session_cookie(&page).expect("session cookie on login page");
    let html = body_string(page).await;
    let token = extract_csrf_token(&html);

    let body = format!("email={email}&password={password}&csrf_token={token}");
    let response = post_form(app, "/login", Some(&cookie), &body).await;
    assert!(
        response.status().is_redirection(),
        "login should redirect, got {}",
        response.status()
    );
    assert_eq!(location(&response), "/dashboard");

    cookie
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count query");
    row.0
}

/// (id, is_admin, last_login_at, last_active_at) for a user, if present.
pub async fn user_by_email(pool: &SqlitePool, email: &str) -> Option<(i64, bool, i64, i64)> {
    sqlx::query_as(
        "SELECT id, is_admin, last_login_at, last_active_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .expect("user lookup")
}

pub async fn rewind_user_clock(pool: &SqlitePool, user_id: i64, ts: i64) {
    sqlx::query("UPDATE users SET last_login_at = ?, last_active_at = ? WHERE id = ?")
        .bind(ts)
        .bind(ts)
        .bind(user_id)
        .execute(pool)
        .await
        .expect("clock rewind");
}
