mod common;

use common::*;
use fintrack::{
    config::reaper::ReaperConfig,
    repositories::SqliteUserRepository,
    services::Reaper,
    test_utils::test_helpers,
};
use std::sync::Arc;

const DAY: i64 = 24 * 60 * 60;

#[tokio::test]
async fn long_inactive_accounts_are_purged_while_active_ones_survive() {
    let (app, pool) = spawn_app().await;

    register(&app, "Ana", "ana@example.com", "secret-one").await;
    register(&app, "Ben", "ben@example.com", "secret-two").await;
    let (ana_id, _, _, _) = user_by_email(&pool, "ana@example.com").await.unwrap();
    let (ben_id, _, _, _) = user_by_email(&pool, "ben@example.com").await.unwrap();

    // Ben owns data that must disappear with him
    test_helpers::insert_test_category(&pool, ben_id, "Rent", 800.0)
        .await
        .unwrap();
    let goal_id = test_helpers::insert_test_goal(&pool, ben_id, "Bike", 600.0)
        .await
        .unwrap();
    test_helpers::insert_test_deposit(&pool, goal_id, 25.0, "2026-08-03")
        .await
        .unwrap();

    let now = chrono::Utc::now().timestamp();
    test_helpers::set_last_active(&pool, ben_id, now - 31 * DAY)
        .await
        .unwrap();
    // Ana's clock is old too, but her own request refreshes it first
    test_helpers::set_last_active(&pool, ana_id, now - 31 * DAY)
        .await
        .unwrap();

    let ana = login(&app, "ana@example.com", "secret-one").await;
    let response = get(&app, "/dashboard", Some(&ana)).await;
    assert!(response.status().is_success());

    let reaper = Reaper::new(
        Arc::new(SqliteUserRepository::new(pool.clone())),
        ReaperConfig::default(),
    );
    let purged = reaper.sweep().await.unwrap();

    assert_eq!(purged, 1);
    assert!(user_by_email(&pool, "ben@example.com").await.is_none());
    assert_eq!(count(&pool, "categories").await, 0);
    assert_eq!(count(&pool, "saving_goals").await, 0);
    assert_eq!(count(&pool, "saving_deposits").await, 0);

    let (_, _, _, ana_active) = user_by_email(&pool, "ana@example.com").await.unwrap();
    assert!(ana_active >= now, "Ana's activity was refreshed by her own request");
}

#[tokio::test]
async fn accounts_inside_the_threshold_are_left_alone() {
    let (app, pool) = spawn_app().await;

    register(&app, "Ana", "ana@example.com", "secret-one").await;
    let (ana_id, _, _, _) = user_by_email(&pool, "ana@example.com").await.unwrap();

    let now = chrono::Utc::now().timestamp();
    test_helpers::set_last_active(&pool, ana_id, now - 29 * DAY)
        .await
        .unwrap();

    let reaper = Reaper::new(
        Arc::new(SqliteUserRepository::new(pool.clone())),
        ReaperConfig::default(),
    );
    let purged = reaper.sweep().await.unwrap();

    assert_eq!(purged, 0);
    assert!(user_by_email(&pool, "ana@example.com").await.is_some());
}

#[tokio::test]
async fn every_authenticated_request_refreshes_the_activity_clock() {
    let (app, pool) = spawn_app().await;

    register(&app, "Ana", "ana@example.com", "secret-one").await;
    let ana = login(&app, "ana@example.com", "secret-one").await;
    let (ana_id, _, _, _) = user_by_email(&pool, "ana@example.com").await.unwrap();

    test_helpers::set_last_active(&pool, ana_id, 1_000).await.unwrap();

    // Any request on any route counts as activity
    get(&app, "/categories", Some(&ana)).await;

    let (_, _, _, last_active) = user_by_email(&pool, "ana@example.com").await.unwrap();
    assert!(last_active > 1_000);

    // Anonymous traffic refreshes nobody
    test_helpers::set_last_active(&pool, ana_id, 1_000).await.unwrap();
    get(&app, "/login", None).await;

    let (_, _, _, last_active) = user_by_email(&pool, "ana@example.com").await.unwrap();
    assert_eq!(last_active, 1_000);
}
