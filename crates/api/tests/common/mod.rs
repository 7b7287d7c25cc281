//! Shared helpers for API integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the same
//! middleware stack (CORS, request ID, timeout, tracing, panic recovery)
//! that production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lms_api::auth::jwt::{generate_access_token, JwtConfig};
use lms_api::auth::password::hash_password;
use lms_api::config::ServerConfig;
use lms_api::router::build_app_router;
use lms_api::state::AppState;
use lms_core::types::DbId;
use lms_db::models::course::CreateCourse;
use lms_db::models::program::CreateProgram;
use lms_db::models::user::CreateUser;
use lms_db::models::video::CreateVideo;
use lms_db::repositories::{CourseRepo, ProgramRepo, RoleRepo, UserRepo, VideoRepo};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        google_client_id: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Perform an unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Perform a GET with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Perform a POST with a JSON body and optional bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Perform a PUT with a JSON body and bearer token.
pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Perform a DELETE with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status, panicking with the body for easier debugging.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Create a user with the given role and return `(user_id, bearer_token)`.
///
/// The password is always `"password123!"` so login-flow tests can reuse it.
pub async fn create_user_with_role(pool: &PgPool, role: &str, username: &str) -> (DbId, String) {
    let role_row = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("role '{role}' not seeded"));

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.test"),
            password_hash: hash_password("password123!").unwrap(),
            role_id: role_row.id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        },
    )
    .await
    .unwrap();

    let token = generate_access_token(user.id, role, &test_config().jwt).unwrap();
    (user.id, token)
}

/// Seed a program, a course, and one video; returns `(course_id, video_id)`.
pub async fn seed_course_with_video(pool: &PgPool) -> (DbId, DbId) {
    let program = ProgramRepo::create(
        pool,
        &CreateProgram {
            title: "Computer Science".to_string(),
            summary: None,
        },
    )
    .await
    .unwrap();

    let course = CourseRepo::create(
        pool,
        "intro-to-rust",
        &CreateCourse {
            title: "Intro to Rust".to_string(),
            code: "CSC101".to_string(),
            credit: 3,
            summary: None,
            program_id: program.id,
            level: "Bachelor".to_string(),
            year: 1,
            semester: "First".to_string(),
            is_elective: false,
        },
    )
    .await
    .unwrap();

    let video = VideoRepo::create(
        pool,
        course.id,
        "ownership-basics",
        &CreateVideo {
            title: "Ownership Basics".to_string(),
            summary: None,
            youtube_url: Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()),
            file_path: None,
            duration_seconds: 100,
        },
    )
    .await
    .unwrap();

    (course.id, video.id)
}
