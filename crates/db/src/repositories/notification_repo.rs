//! Repository for the `notifications` table.
//!
//! In-app delivery is eager: every insert marks the row as sent. The only
//! later transitions are unread -> read and explicit deletion.

use lms_core::notification::NotificationDraft;
use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, recipient_id, title, message, notification_type, priority, \
     is_read, read_at, is_sent, sent_at, related_course_id, related_video_id, \
     action_url, icon, color, created_at";

/// Provides CRUD operations for the notification feed.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Persist a draft for one recipient, marked sent at creation.
    pub async fn create(
        pool: &PgPool,
        recipient_id: DbId,
        draft: &NotificationDraft,
        related_course_id: Option<DbId>,
        related_video_id: Option<DbId>,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications \
                 (recipient_id, title, message, notification_type, priority, \
                  is_sent, sent_at, related_course_id, related_video_id, action_url, icon, color) \
             VALUES ($1, $2, $3, $4, $5, TRUE, NOW(), $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .bind(&draft.title)
            .bind(&draft.message)
            .bind(draft.notification_type.as_str())
            .bind(draft.priority.as_str())
            .bind(related_course_id)
            .bind(related_video_id)
            .bind(draft.action_url.as_deref())
            .bind(draft.icon())
            .bind(draft.color())
            .fetch_one(pool)
            .await
    }

    /// Fan one draft out to many recipients in a single batch insert.
    /// Returns the number of rows created.
    ///
    /// No preference filtering happens here; callers that want it must
    /// filter the recipient list first.
    pub async fn broadcast(
        pool: &PgPool,
        recipient_ids: &[DbId],
        draft: &NotificationDraft,
    ) -> Result<u64, sqlx::Error> {
        if recipient_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO notifications \
                 (recipient_id, title, message, notification_type, priority, \
                  is_sent, sent_at, action_url, icon, color) \
             SELECT r, $2, $3, $4, $5, TRUE, NOW(), $6, $7, $8 \
             FROM UNNEST($1::BIGINT[]) AS r",
        )
        .bind(recipient_ids)
        .bind(&draft.title)
        .bind(&draft.message)
        .bind(draft.notification_type.as_str())
        .bind(draft.priority.as_str())
        .bind(draft.action_url.as_deref())
        .bind(draft.icon())
        .bind(draft.color())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's notifications, newest first, with optional unread and
    /// type filters.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        notification_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let unread_filter = if unread_only {
            "AND is_read = FALSE"
        } else {
            ""
        };
        let type_filter = if notification_type.is_some() {
            "AND notification_type = $4"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient_id = $1 {unread_filter} {type_filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        let mut query_as = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset);
        if let Some(ty) = notification_type {
            query_as = query_as.bind(ty);
        }
        query_as.fetch_all(pool).await
    }

    /// Mark a notification as read.
    ///
    /// Idempotent: `read_at` is set once and survives repeat calls. Returns
    /// `None` if the notification does not exist. Ownership is checked by
    /// the caller, which has already fetched the row.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = NOW() \
             WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a notification. Returns `false` if it did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
