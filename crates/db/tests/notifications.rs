//! Repository-level tests for notification creation, read-state, and the
//! batched broadcast.

use lms_core::notification::{self, Priority};
use lms_core::types::DbId;
use lms_db::models::user::CreateUser;
use lms_db::repositories::{NotificationPreferenceRepo, NotificationRepo, RoleRepo, UserRepo};
use sqlx::PgPool;

async fn seed_student(pool: &PgPool, username: &str) -> DbId {
    let role = RoleRepo::find_by_name(pool, "student")
        .await
        .unwrap()
        .expect("student role seeded");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.into(),
            email: format!("{}@example.test", username.replace('/', ".")),
            password_hash: "$argon2id$fake".into(),
            role_id: role.id,
            first_name: String::new(),
            last_name: String::new(),
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_marks_sent_at_insert_time(pool: PgPool) {
    let student = seed_student(&pool, "std/26/40001").await;

    let draft = notification::welcome();
    let row = NotificationRepo::create(&pool, student, &draft, None, None)
        .await
        .unwrap();

    assert!(row.is_sent, "in-app delivery is eager");
    assert!(row.sent_at.is_some());
    assert!(!row.is_read);
    assert!(row.read_at.is_none());
    assert_eq!(row.notification_type, "welcome");
    assert_eq!(row.icon, "hand-wave");
    assert_eq!(row.priority, "high");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_read_is_idempotent_at_row_level(pool: PgPool) {
    let student = seed_student(&pool, "std/26/40002").await;
    let draft = notification::announcement("Hello", "World", Priority::Low);
    let row = NotificationRepo::create(&pool, student, &draft, None, None)
        .await
        .unwrap();

    let first = NotificationRepo::mark_read(&pool, row.id)
        .await
        .unwrap()
        .unwrap();
    assert!(first.is_read);
    let read_at = first.read_at.unwrap();

    let second = NotificationRepo::mark_read(&pool, row.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        second.read_at.unwrap(),
        read_at,
        "read_at is set exactly once"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_is_newest_first(pool: PgPool) {
    let student = seed_student(&pool, "std/26/40003").await;
    for i in 0..3 {
        let draft =
            notification::announcement(&format!("n{i}"), "body", Priority::Medium);
        NotificationRepo::create(&pool, student, &draft, None, None)
            .await
            .unwrap();
    }

    let rows = NotificationRepo::list_for_user(&pool, student, false, None, 50, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    for pair in rows.windows(2) {
        assert!(
            pair[0].created_at >= pair[1].created_at,
            "ordering must be created_at descending"
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn broadcast_inserts_one_row_per_recipient(pool: PgPool) {
    let mut recipients = Vec::new();
    for i in 0..5 {
        recipients.push(seed_student(&pool, &format!("std/26/4100{i}")).await);
    }

    let draft = notification::announcement("Maintenance", "msg", Priority::Medium);
    let count = NotificationRepo::broadcast(&pool, &recipients, &draft)
        .await
        .unwrap();
    assert_eq!(count, 5);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 5);

    for recipient in recipients {
        assert_eq!(
            NotificationRepo::unread_count(&pool, recipient).await.unwrap(),
            1
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn broadcast_to_nobody_is_a_no_op(pool: PgPool) {
    let draft = notification::announcement("Empty", "msg", Priority::Medium);
    let count = NotificationRepo::broadcast(&pool, &[], &draft).await.unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn preference_defaults_are_all_enabled(pool: PgPool) {
    let student = seed_student(&pool, "std/26/40004").await;

    NotificationPreferenceRepo::ensure_defaults(&pool, student)
        .await
        .unwrap();
    // Re-running is a no-op, not a duplicate row.
    NotificationPreferenceRepo::ensure_defaults(&pool, student)
        .await
        .unwrap();

    let prefs = NotificationPreferenceRepo::get_or_create(&pool, student)
        .await
        .unwrap();
    assert!(prefs.app_progress_updates);
    assert!(prefs.email_course_completion);
    assert_eq!(prefs.digest_frequency, "immediate");
    assert!(prefs.quiet_hours_start.is_none());

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notification_preferences WHERE user_id = $1")
            .bind(student)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}
