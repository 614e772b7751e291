mod common;

use axum::http::StatusCode;
use common::*;
use fintrack::test_utils::test_helpers;

#[tokio::test]
async fn anonymous_users_are_sent_to_login() {
    let (app, _pool) = spawn_app().await;

    let response = get(&app, "/admin/users", None).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn non_admins_are_bounced_to_the_dashboard_with_a_warning() {
    let (app, _pool) = spawn_app().await;

    register(&app, "Ana", "ana@example.com", "secret-one").await;
    register(&app, "Ben", "ben@example.com", "secret-two").await;
    let ben = login(&app, "ben@example.com", "secret-two").await;

    let response = get(&app, "/admin/users", Some(&ben)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard?notice=admin_only");

    // The landing page surfaces the warning
    let response = get(&app, "/dashboard?notice=admin_only", Some(&ben)).await;
    let html = body_string(response).await;
    assert!(html.contains("Only the administrator can access that section."));
}

#[tokio::test]
async fn the_admin_sees_every_account() {
    let (app, _pool) = spawn_app().await;

    register(&app, "Ana", "ana@example.com", "secret-one").await;
    register(&app, "Ben", "ben@example.com", "secret-two").await;
    let ana = login(&app, "ana@example.com", "secret-one").await;

    let response = get(&app, "/admin/users", Some(&ana)).await;
    assert!(response.status().is_success());

    let html = body_string(response).await;
    assert!(html.contains("ana@example.com"));
    assert!(html.contains("ben@example.com"));
}

#[tokio::test]
async fn admin_self_deletion_is_rejected_with_no_state_change() {
    let (app, pool) = spawn_app().await;

    register(&app, "Ana", "ana@example.com", "secret-one").await;
    let ana = login(&app, "ana@example.com", "secret-one").await;
    let (ana_id, _, _, _) = user_by_email(&pool, "ana@example.com").await.unwrap();

    let token = csrf_from(&app, "/admin/users", &ana).await;
    let response = post_form(
        &app,
        &format!("/admin/delete_user/{ana_id}"),
        Some(&ana),
        &format!("csrf_token={token}"),
    )
    .await;

    assert_eq!(location(&response), "/admin/users?notice=self_delete");
    assert!(user_by_email(&pool, "ana@example.com").await.is_some());
}

#[tokio::test]
async fn admin_deleting_another_user_cascades() {
    let (app, pool) = spawn_app().await;

    register(&app, "Ana", "ana@example.com", "secret-one").await;
    register(&app, "Ben", "ben@example.com", "secret-two").await;
    let (ben_id, _, _, _) = user_by_email(&pool, "ben@example.com").await.unwrap();

    test_helpers::insert_test_category(&pool, ben_id, "Rent", 800.0)
        .await
        .unwrap();
    let goal_id = test_helpers::insert_test_goal(&pool, ben_id, "Bike", 600.0)
        .await
        .unwrap();
    test_helpers::insert_test_deposit(&pool, goal_id, 25.0, "2026-08-03")
        .await
        .unwrap();

    let ana = login(&app, "ana@example.com", "secret-one").await;
    let token = csrf_from(&app, "/admin/users", &ana).await;
    let response = post_form(
        &app,
        &format!("/admin/delete_user/{ben_id}"),
        Some(&ana),
        &format!("csrf_token={token}"),
    )
    .await;

    assert_eq!(location(&response), "/admin/users?notice=deleted");
    assert!(user_by_email(&pool, "ben@example.com").await.is_none());
    assert!(user_by_email(&pool, "ana@example.com").await.is_some());
    assert_eq!(count(&pool, "categories").await, 0);
    assert_eq!(count(&pool, "saving_goals").await, 0);
    assert_eq!(count(&pool, "saving_deposits").await, 0);
}

#[tokio::test]
async fn deleting_a_missing_user_is_not_found() {
    let (app, _pool) = spawn_app().await;

    register(&app, "Ana", "ana@example.com", "secret-one").await;
    let ana = login(&app, "ana@example.com", "secret-one").await;

    let token = csrf_from(&app, "/admin/users", &ana).await;
    let response = post_form(
        &app,
        "/admin/delete_user/4242",
        Some(&ana),
        &format!("csrf_token={token}"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
