mod common;

use axum::http::StatusCode;
use common::*;

async fn signed_in_user(app: &axum::Router, email: &str) -> String {
    register(app, "User", email, "secret-pw").await;
    login(app, email, "secret-pw").await
}

#[tokio::test]
async fn categories_can_be_created_listed_and_deleted() {
    let (app, pool) = spawn_app().await;
    let cookie = signed_in_user(&app, "ana@example.com").await;

    let token = csrf_from(&app, "/categories", &cookie).await;
    let response = post_form(
        &app,
        "/categories",
        Some(&cookie),
        &format!("name=Groceries&monthly_target=450.50&csrf_token={token}"),
    )
    .await;
    assert_eq!(location(&response), "/categories");

    let page = get(&app, "/categories", Some(&cookie)).await;
    let html = body_string(page).await;
    assert!(html.contains("Groceries"));
    assert!(html.contains("450.50"));

    let id: (i64,) = sqlx::query_as("SELECT id FROM categories WHERE name = 'Groceries'")
        .fetch_one(&pool)
        .await
        .unwrap();

    let token = csrf_from(&app, "/categories", &cookie).await;
    let response = post_form(
        &app,
        &format!("/categories/{}/delete", id.0),
        Some(&cookie),
        &format!("csrf_token={token}"),
    )
    .await;
    assert_eq!(location(&response), "/categories");
    assert_eq!(count(&pool, "categories").await, 0);
}

#[tokio::test]
async fn invalid_amounts_re_render_the_form() {
    let (app, pool) = spawn_app().await;
    let cookie = signed_in_user(&app, "ana@example.com").await;

    let token = csrf_from(&app, "/categories", &cookie).await;
    let response = post_form(
        &app,
        "/categories",
        Some(&cookie),
        &format!("name=Rent&monthly_target=-5&csrf_token={token}"),
    )
    .await;

    assert!(response.status().is_success());
    let html = body_string(response).await;
    assert!(html.contains("Amount must be a non-negative number"));
    assert_eq!(count(&pool, "categories").await, 0);
}

#[tokio::test]
async fn incomes_default_to_today_and_total_up() {
    let (app, pool) = spawn_app().await;
    let cookie = signed_in_user(&app, "ana@example.com").await;

    let token = csrf_from(&app, "/incomes", &cookie).await;
    post_form(
        &app,
        "/incomes",
        Some(&cookie),
        &format!("amount=100.25&date=2026-08-01&csrf_token={token}"),
    )
    .await;

    // Blank date defaults to today
    let token = csrf_from(&app, "/incomes", &cookie).await;
    let response = post_form(
        &app,
        "/incomes",
        Some(&cookie),
        &format!("amount=50&date=&csrf_token={token}"),
    )
    .await;
    assert_eq!(location(&response), "/incomes");

    let page = get(&app, "/incomes", Some(&cookie)).await;
    let html = body_string(page).await;
    assert!(html.contains("150.25"));

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let dates: Vec<(String,)> = sqlx::query_as("SELECT date FROM incomes ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(dates[0].0, "2026-08-01");
    assert_eq!(dates[1].0, today);
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let (app, pool) = spawn_app().await;
    let cookie = signed_in_user(&app, "ana@example.com").await;

    let token = csrf_from(&app, "/incomes", &cookie).await;
    let response = post_form(
        &app,
        "/incomes",
        Some(&cookie),
        &format!("amount=10&date=01/08/2026&csrf_token={token}"),
    )
    .await;

    assert!(response.status().is_success());
    let html = body_string(response).await;
    assert!(html.contains("Date must be in YYYY-MM-DD format"));
    assert_eq!(count(&pool, "incomes").await, 0);
}

#[tokio::test]
async fn goal_deposits_accumulate_and_cascade_with_the_goal() {
    let (app, pool) = spawn_app().await;
    let cookie = signed_in_user(&app, "ana@example.com").await;

    let token = csrf_from(&app, "/goals", &cookie).await;
    post_form(
        &app,
        "/goals",
        Some(&cookie),
        &format!("name=Vacation&target_amount=1500&deadline=2026-12-31&csrf_token={token}"),
    )
    .await;

    let goal: (i64,) = sqlx::query_as("SELECT id FROM saving_goals WHERE name = 'Vacation'")
        .fetch_one(&pool)
        .await
        .unwrap();
    let goal_path = format!("/goals/{}", goal.0);

    for amount in ["200", "350.50"] {
        let token = csrf_from(&app, &goal_path, &cookie).await;
        let response = post_form(
            &app,
            &format!("{goal_path}/deposits"),
            Some(&cookie),
            &format!("amount={amount}&date=2026-08-05&csrf_token={token}"),
        )
        .await;
        assert_eq!(location(&response), goal_path);
    }

    let page = get(&app, &goal_path, Some(&cookie)).await;
    let html = body_string(page).await;
    assert!(html.contains("550.50"));

    // Deleting the goal removes its deposits
    let token = csrf_from(&app, "/goals", &cookie).await;
    post_form(
        &app,
        &format!("{goal_path}/delete"),
        Some(&cookie),
        &format!("csrf_token={token}"),
    )
    .await;

    assert_eq!(count(&pool, "saving_goals").await, 0);
    assert_eq!(count(&pool, "saving_deposits").await, 0);
}

#[tokio::test]
async fn users_cannot_touch_each_others_records() {
    let (app, pool) = spawn_app().await;

    let ana = signed_in_user(&app, "ana@example.com").await;
    let token = csrf_from(&app, "/goals", &ana).await;
    post_form(
        &app,
        "/goals",
        Some(&ana),
        &format!("name=Vacation&target_amount=1500&deadline=&csrf_token={token}"),
    )
    .await;
    let goal: (i64,) = sqlx::query_as("SELECT id FROM saving_goals")
        .fetch_one(&pool)
        .await
        .unwrap();

    register(&app, "Ben", "ben@example.com", "secret-two").await;
    let ben = login(&app, "ben@example.com", "secret-two").await;

    // Ben cannot see Ana's goal
    let response = get(&app, &format!("/goals/{}", goal.0), Some(&ben)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Nor deposit into it
    let token = csrf_from(&app, "/goals", &ben).await;
    let response = post_form(
        &app,
        &format!("/goals/{}/deposits", goal.0),
        Some(&ben),
        &format!("amount=10&date=&csrf_token={token}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(count(&pool, "saving_deposits").await, 0);
}

#[tokio::test]
async fn working_days_setting_is_validated_and_saved() {
    let (app, pool) = spawn_app().await;
    let cookie = signed_in_user(&app, "ana@example.com").await;

    // Default comes from registration
    let days: (i64,) = sqlx::query_as("SELECT working_days FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(days.0, 26);

    let token = csrf_from(&app, "/settings", &cookie).await;
    let response = post_form(
        &app,
        "/settings",
        Some(&cookie),
        &format!("working_days=22&csrf_token={token}"),
    )
    .await;
    assert_eq!(location(&response), "/settings?notice=saved");

    let days: (i64,) = sqlx::query_as("SELECT working_days FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(days.0, 22);

    // Out-of-range values re-render with an error and change nothing
    let token = csrf_from(&app, "/settings", &cookie).await;
    let response = post_form(
        &app,
        "/settings",
        Some(&cookie),
        &format!("working_days=40&csrf_token={token}"),
    )
    .await;
    assert!(response.status().is_success());
    let html = body_string(response).await;
    assert!(html.contains("Working days must be between 1 and 31"));

    let days: (i64,) = sqlx::query_as("SELECT working_days FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(days.0, 22);
}
