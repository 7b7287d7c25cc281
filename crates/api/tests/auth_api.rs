//! Integration tests for login, refresh rotation, and logout.

mod common;

use axum::http::StatusCode;
use common::{assert_status, create_user_with_role, get_auth, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_tokens_and_user_info(pool: PgPool) {
    create_user_with_role(&pool, "student", "std/26/30001").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": "std/26/30001", "password": "password123!" }),
    )
    .await;

    let json = assert_status(response, StatusCode::OK).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["username"], "std/26/30001");
    assert_eq!(json["user"]["role"], "student");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_fails(pool: PgPool) {
    create_user_with_role(&pool, "student", "std/26/30002").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": "std/26/30002", "password": "wrong" }),
    )
    .await;

    let json = assert_status(response, StatusCode::UNAUTHORIZED).await;
    // The message must not reveal whether the username exists.
    assert_eq!(json["error"], "Invalid username or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn account_locks_after_repeated_failures(pool: PgPool) {
    create_user_with_role(&pool, "student", "std/26/30003").await;
    let app = common::build_test_app(pool);

    for _ in 0..5 {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/login",
            None,
            serde_json::json!({ "username": "std/26/30003", "password": "wrong" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the correct password is rejected while the account is locked.
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": "std/26/30003", "password": "password123!" }),
    )
    .await;
    assert_status(response, StatusCode::FORBIDDEN).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    create_user_with_role(&pool, "student", "std/26/30004").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": "std/26/30004", "password": "password123!" }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    let refresh_token = json["refresh_token"].as_str().unwrap().to_string();

    // First refresh succeeds and returns a new refresh token.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        None,
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);

    // The rotated-out token is dead.
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        None,
        serde_json::json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_status(response, StatusCode::UNAUTHORIZED).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/notifications", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::get(app, "/api/v1/notifications").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
