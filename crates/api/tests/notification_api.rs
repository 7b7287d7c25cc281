//! Integration tests for the notification feed, read-state transitions,
//! preferences, and the admin broadcast.

mod common;

use axum::http::StatusCode;
use common::{
    assert_status, create_user_with_role, delete_auth, get_auth, post_json, put_json,
};
use lms_core::notification::{self, Priority};
use lms_db::repositories::NotificationRepo;
use sqlx::PgPool;

/// Insert one announcement directly for a recipient and return its id.
async fn seed_notification(pool: &PgPool, recipient_id: i64) -> i64 {
    let draft = notification::announcement("Heads up", "Something happened.", Priority::Medium);
    NotificationRepo::create(pool, recipient_id, &draft, None, None)
        .await
        .unwrap()
        .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_read_sets_read_at_once(pool: PgPool) {
    let (student_id, token) = create_user_with_role(&pool, "student", "std/26/20001").await;
    let notification_id = seed_notification(&pool, student_id).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/notifications/{notification_id}/read");

    let response = post_json(app.clone(), &uri, Some(&token), serde_json::json!({})).await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_read"], true);
    let read_at = json["data"]["read_at"].as_str().unwrap().to_string();

    // Marking again is a no-op: same state, same read_at.
    let response = post_json(app, &uri, Some(&token), serde_json::json!({})).await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_read"], true);
    assert_eq!(json["data"]["read_at"], read_at.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_read_rejects_other_recipients(pool: PgPool) {
    let (owner_id, _owner_token) = create_user_with_role(&pool, "student", "std/26/20002").await;
    let (_other_id, other_token) = create_user_with_role(&pool, "student", "std/26/20003").await;
    let notification_id = seed_notification(&pool, owner_id).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/notifications/{notification_id}/read"),
        Some(&other_token),
        serde_json::json!({}),
    )
    .await;

    let json = assert_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_read_missing_notification_returns_404(pool: PgPool) {
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/20004").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/notifications/424242/read",
        Some(&token),
        serde_json::json!({}),
    )
    .await;

    assert_status(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_all_read_returns_count(pool: PgPool) {
    let (student_id, token) = create_user_with_role(&pool, "student", "std/26/20005").await;
    for _ in 0..3 {
        seed_notification(&pool, student_id).await;
    }
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/notifications/read-all",
        Some(&token),
        serde_json::json!({}),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["marked_read"], 3);

    let response = get_auth(app, "/api/v1/notifications/unread-count", &token).await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_unread_and_type(pool: PgPool) {
    let (student_id, token) = create_user_with_role(&pool, "student", "std/26/20006").await;
    let first = seed_notification(&pool, student_id).await;
    seed_notification(&pool, student_id).await;
    NotificationRepo::mark_read(&pool, first).await.unwrap();
    let app = common::build_test_app(pool);

    let response = get_auth(
        app.clone(),
        "/api/v1/notifications?unread_only=true",
        &token,
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["unread_count"], 1);

    // Unknown type filters are rejected, not silently empty.
    let response = get_auth(app, "/api/v1/notifications?type=bogus", &token).await;
    assert_status(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_is_recipient_scoped(pool: PgPool) {
    let (owner_id, owner_token) = create_user_with_role(&pool, "student", "std/26/20007").await;
    let (_other_id, other_token) = create_user_with_role(&pool, "student", "std/26/20008").await;
    let notification_id = seed_notification(&pool, owner_id).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/notifications/{notification_id}");

    let response = delete_auth(app.clone(), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn broadcast_creates_one_row_per_student(pool: PgPool) {
    let (_admin_id, admin_token) = create_user_with_role(&pool, "admin", "admin-1").await;
    let mut student_tokens = Vec::new();
    for i in 0..5 {
        let (_, token) =
            create_user_with_role(&pool, "student", &format!("std/26/2100{i}")).await;
        student_tokens.push(token);
    }
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/notifications/announcements",
        Some(&admin_token),
        serde_json::json!({ "title": "Maintenance", "message": "Back at noon." }),
    )
    .await;
    let json = assert_status(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["created"], 5);

    // Each student sees exactly one announcement, sent and unread.
    for token in &student_tokens {
        let response = get_auth(app.clone(), "/api/v1/notifications", token).await;
        let json = assert_status(response, StatusCode::OK).await;
        let items = json["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["notification_type"], "announcement");
        assert_eq!(items[0]["is_sent"], true);
        assert_eq!(items[0]["is_read"], false);
        assert_eq!(items[0]["icon"], "bullhorn");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn broadcast_requires_admin(pool: PgPool) {
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/20009").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/notifications/announcements",
        Some(&token),
        serde_json::json!({ "title": "Nope", "message": "Not allowed." }),
    )
    .await;

    assert_status(response, StatusCode::FORBIDDEN).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn preferences_default_to_all_enabled(pool: PgPool) {
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/20010").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/notifications/preferences", &token).await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["app_progress_updates"], true);
    assert_eq!(json["data"]["email_announcements"], true);
    assert_eq!(json["data"]["digest_frequency"], "immediate");

    // Patch a single toggle; everything else is untouched.
    let response = put_json(
        app.clone(),
        "/api/v1/notifications/preferences",
        &token,
        serde_json::json!({ "app_progress_updates": false, "digest_frequency": "weekly" }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["app_progress_updates"], false);
    assert_eq!(json["data"]["app_announcements"], true);
    assert_eq!(json["data"]["digest_frequency"], "weekly");

    // Unknown digest frequency is rejected.
    let response = put_json(
        app,
        "/api/v1/notifications/preferences",
        &token,
        serde_json::json!({ "digest_frequency": "hourly" }),
    )
    .await;
    assert_status(response, StatusCode::BAD_REQUEST).await;
}
