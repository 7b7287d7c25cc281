//! Repository for the `notification_preferences` table.
//!
//! One row per account, created with all-true defaults the moment the
//! account is created.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{NotificationPreference, UpdatePreferences};

/// Column list for `notification_preferences` queries.
const COLUMNS: &str = "id, user_id, \
     email_progress_updates, email_course_completion, email_achievements, \
     email_announcements, email_reminders, \
     app_progress_updates, app_course_completion, app_achievements, \
     app_announcements, app_reminders, \
     digest_frequency, quiet_hours_start, quiet_hours_end, created_at, updated_at";

/// Provides storage for per-user notification preferences.
pub struct NotificationPreferenceRepo;

impl NotificationPreferenceRepo {
    /// Create the defaulted preference row for a new account. A no-op when
    /// the row already exists.
    pub async fn ensure_defaults(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO notification_preferences (user_id) \
             VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// The user's preference row, creating the defaulted one if missing.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<NotificationPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_preferences (user_id) \
             VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE \
                 SET user_id = notification_preferences.user_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Patch preference toggles, returning the updated row. Missing fields
    /// keep their current values.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdatePreferences,
    ) -> Result<NotificationPreference, sqlx::Error> {
        // The row is guaranteed to exist before patching.
        Self::ensure_defaults(pool, user_id).await?;

        let query = format!(
            "UPDATE notification_preferences SET \
                 email_progress_updates = COALESCE($2, email_progress_updates), \
                 email_course_completion = COALESCE($3, email_course_completion), \
                 email_achievements = COALESCE($4, email_achievements), \
                 email_announcements = COALESCE($5, email_announcements), \
                 email_reminders = COALESCE($6, email_reminders), \
                 app_progress_updates = COALESCE($7, app_progress_updates), \
                 app_course_completion = COALESCE($8, app_course_completion), \
                 app_achievements = COALESCE($9, app_achievements), \
                 app_announcements = COALESCE($10, app_announcements), \
                 app_reminders = COALESCE($11, app_reminders), \
                 digest_frequency = COALESCE($12, digest_frequency), \
                 quiet_hours_start = COALESCE($13, quiet_hours_start), \
                 quiet_hours_end = COALESCE($14, quiet_hours_end), \
                 updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .bind(input.email_progress_updates)
            .bind(input.email_course_completion)
            .bind(input.email_achievements)
            .bind(input.email_announcements)
            .bind(input.email_reminders)
            .bind(input.app_progress_updates)
            .bind(input.app_course_completion)
            .bind(input.app_achievements)
            .bind(input.app_announcements)
            .bind(input.app_reminders)
            .bind(input.digest_frequency.as_deref())
            .bind(input.quiet_hours_start)
            .bind(input.quiet_hours_end)
            .fetch_one(pool)
            .await
    }
}
