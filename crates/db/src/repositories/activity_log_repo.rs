//! Repository for the append-only `activity_log` table.

use sqlx::PgPool;

use crate::models::activity::ActivityLog;

/// Column list for `activity_log` queries.
const COLUMNS: &str = "id, message, created_at";

/// Provides appends and recent-entry listing for the activity feed.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append an entry.
    pub async fn record(pool: &PgPool, message: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO activity_log (message) VALUES ($1)")
            .bind(message)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Most recent entries, newest first.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM activity_log ORDER BY created_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
