//! Integration tests for the watch-progress endpoints, including the
//! notification side effects of threshold crossings.

mod common;

use axum::http::StatusCode;
use common::{
    assert_status, create_user_with_role, get_auth, post_json, seed_course_with_video,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_heartbeat_creates_progress_row(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10001").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/progress/videos/{video_id}"),
        Some(&token),
        serde_json::json!({ "current_time": 25, "duration": 100 }),
    )
    .await;

    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["watch_time"], 25);
    assert_eq!(json["data"]["last_position"], 25);
    assert_eq!(json["data"]["total_duration"], 100);
    assert_eq!(json["data"]["completion_percentage"], 25.0);
    assert_eq!(json["data"]["is_completed"], false);
    assert_eq!(json["data"]["time_watched_display"], "25s");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_video_returns_404(pool: PgPool) {
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10002").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/progress/videos/999999",
        Some(&token),
        serde_json::json!({ "current_time": 10, "duration": 100 }),
    )
    .await;

    assert_status(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_heartbeat_returns_400(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10003").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/progress/videos/{video_id}"),
        Some(&token),
        serde_json::json!({ "current_time": -5, "duration": 100 }),
    )
    .await;

    let json = assert_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_student_cannot_record_progress(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_lecturer_id, token) = create_user_with_role(&pool, "lecturer", "lec/26/10004").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        &format!("/api/v1/progress/videos/{video_id}"),
        Some(&token),
        serde_json::json!({ "current_time": 10, "duration": 100 }),
    )
    .await;

    assert_status(response, StatusCode::FORBIDDEN).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn snapshot_for_unwatched_video_is_zeroed(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10005").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, &format!("/api/v1/progress/videos/{video_id}"), &token).await;

    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["watch_time"], 0);
    assert_eq!(json["data"]["completion_percentage"], 0.0);
    assert_eq!(json["data"]["is_completed"], false);
    assert_eq!(json["data"]["progress_display"], "0.0%");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_heartbeat_does_not_double_count(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10006").await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/progress/videos/{video_id}");
    let body = serde_json::json!({ "current_time": 40, "duration": 100 });

    let first = post_json(app.clone(), &uri, Some(&token), body.clone()).await;
    let json = assert_status(first, StatusCode::OK).await;
    assert_eq!(json["data"]["watch_time"], 40);

    // Retrying the same heartbeat leaves watch_time and position unchanged.
    let second = post_json(app, &uri, Some(&token), body).await;
    let json = assert_status(second, StatusCode::OK).await;
    assert_eq!(json["data"]["watch_time"], 40);
    assert_eq!(json["data"]["last_position"], 40);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rewind_keeps_watch_time_and_tracks_position(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10007").await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/progress/videos/{video_id}");

    post_json(
        app.clone(),
        &uri,
        Some(&token),
        serde_json::json!({ "current_time": 30, "duration": 100 }),
    )
    .await;

    let response = post_json(
        app,
        &uri,
        Some(&token),
        serde_json::json!({ "current_time": 10, "duration": 100 }),
    )
    .await;

    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["watch_time"], 30, "rewind must not subtract");
    assert_eq!(json["data"]["last_position"], 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn crossing_halfway_creates_progress_notification(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10008").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/progress/videos/{video_id}"),
        Some(&token),
        serde_json::json!({ "current_time": 60, "duration": 100 }),
    )
    .await;
    assert_status(response, StatusCode::OK).await;

    let response = get_auth(app, "/api/v1/notifications", &token).await;
    let json = assert_status(response, StatusCode::OK).await;

    let types: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["notification_type"].as_str().unwrap())
        .collect();
    assert!(
        types.contains(&"progress_update"),
        "expected a progress_update notification, got {types:?}"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completing_the_only_video_completes_the_course(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10009").await;
    let app = common::build_test_app(pool);

    // One jump straight past the 90% completion threshold.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/progress/videos/{video_id}"),
        Some(&token),
        serde_json::json!({ "current_time": 95, "duration": 100 }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_completed"], true);

    let response = get_auth(app, "/api/v1/notifications", &token).await;
    let json = assert_status(response, StatusCode::OK).await;

    let types: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["notification_type"].as_str().unwrap())
        .collect();
    assert!(
        types.contains(&"video_completion"),
        "expected video_completion, got {types:?}"
    );
    assert!(
        types.contains(&"course_completion"),
        "the only video is done, so the course is too; got {types:?}"
    );
    // The completion event supersedes the milestone band.
    assert!(
        !types.contains(&"progress_update"),
        "no separate milestone notification on the completing call"
    );

    // Every notification is sent-on-creation and starts unread.
    for n in json["data"].as_array().unwrap() {
        assert_eq!(n["is_sent"], true);
        assert_eq!(n["is_read"], false);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_does_not_revert_on_rewind(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10010").await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/progress/videos/{video_id}");

    post_json(
        app.clone(),
        &uri,
        Some(&token),
        serde_json::json!({ "current_time": 95, "duration": 100 }),
    )
    .await;

    let response = post_json(
        app,
        &uri,
        Some(&token),
        serde_json::json!({ "current_time": 5, "duration": 100 }),
    )
    .await;

    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_completed"], true, "completion is sticky");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_aggregates_per_course(pool: PgPool) {
    let (_course_id, video_id) = seed_course_with_video(&pool).await;
    let (_student_id, token) = create_user_with_role(&pool, "student", "std/26/10011").await;
    let app = common::build_test_app(pool);

    post_json(
        app.clone(),
        &format!("/api/v1/progress/videos/{video_id}"),
        Some(&token),
        serde_json::json!({ "current_time": 95, "duration": 100 }),
    )
    .await;

    let response = get_auth(app, "/api/v1/progress/dashboard", &token).await;
    let json = assert_status(response, StatusCode::OK).await;

    assert_eq!(json["data"]["total_videos"], 1);
    assert_eq!(json["data"]["completed_videos"], 1);
    assert_eq!(json["data"]["total_watch_time"], 95);
    assert_eq!(json["data"]["overall_completion"], 100.0);

    let courses = json["data"]["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["course_title"], "Intro to Rust");
    assert_eq!(courses[0]["videos_completed"], 1);
}
