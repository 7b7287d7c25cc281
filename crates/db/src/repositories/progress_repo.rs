//! Repository for the `video_progress` table.
//!
//! [`ProgressRepo::record`] is the write path for player heartbeats. Racing
//! heartbeats for the same (student, video) pair are serialized by a
//! transaction: an idempotent insert (backed by the pair's unique
//! constraint), a `SELECT ... FOR UPDATE`, the pure state fold from
//! `lms_core::progress`, and a single `UPDATE`. Two concurrent calls can
//! therefore never create two rows or lose a forward increment.

use chrono::Utc;
use lms_core::progress::{ProgressState, ProgressTransition};
use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::{CourseProgressSummary, VideoProgress};

/// Column list for `video_progress` queries.
const COLUMNS: &str = "id, student_id, video_id, watch_time, total_duration, last_position, \
     completion_percentage, is_completed, first_watched_at, last_watched_at, completed_at";

/// Result of folding one heartbeat into a progress row.
#[derive(Debug, Clone)]
pub struct RecordedProgress {
    /// The row after the update.
    pub row: VideoProgress,
    /// The row was created by this call (first heartbeat for the pair).
    pub started: bool,
    /// Threshold crossings produced by this call.
    pub transition: ProgressTransition,
}

/// Provides watch-progress recording and aggregation.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Fold a heartbeat `(position, duration)` into the (student, video)
    /// progress row, creating it on first contact.
    ///
    /// Inputs must be non-negative; the HTTP boundary validates via
    /// `lms_core::progress::validate_heartbeat` before calling.
    pub async fn record(
        pool: &PgPool,
        student_id: DbId,
        video_id: DbId,
        position: i64,
        duration: i64,
    ) -> Result<RecordedProgress, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Idempotent create; the unique constraint resolves insert races.
        let started = sqlx::query(
            "INSERT INTO video_progress (student_id, video_id) \
             VALUES ($1, $2) \
             ON CONFLICT (student_id, video_id) DO NOTHING",
        )
        .bind(student_id)
        .bind(video_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        // Row-level lock for the read-modify-write.
        let select = format!(
            "SELECT {COLUMNS} FROM video_progress \
             WHERE student_id = $1 AND video_id = $2 \
             FOR UPDATE"
        );
        let row: VideoProgress = sqlx::query_as(&select)
            .bind(student_id)
            .bind(video_id)
            .fetch_one(&mut *tx)
            .await?;

        let mut state = ProgressState {
            watch_time: row.watch_time,
            total_duration: row.total_duration,
            last_position: row.last_position,
            completion_percentage: row.completion_percentage,
            is_completed: row.is_completed,
            completed_at: row.completed_at,
        };
        let transition = state.apply(position, duration, Utc::now());

        let update = format!(
            "UPDATE video_progress SET \
                 watch_time = $3, \
                 total_duration = $4, \
                 last_position = $5, \
                 completion_percentage = $6, \
                 is_completed = $7, \
                 completed_at = $8, \
                 last_watched_at = NOW() \
             WHERE student_id = $1 AND video_id = $2 \
             RETURNING {COLUMNS}"
        );
        let row: VideoProgress = sqlx::query_as(&update)
            .bind(student_id)
            .bind(video_id)
            .bind(state.watch_time)
            .bind(state.total_duration)
            .bind(state.last_position)
            .bind(state.completion_percentage)
            .bind(state.is_completed)
            .bind(state.completed_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(RecordedProgress {
            row,
            started,
            transition,
        })
    }

    /// The progress row for a (student, video) pair, if any.
    pub async fn find(
        pool: &PgPool,
        student_id: DbId,
        video_id: DbId,
    ) -> Result<Option<VideoProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_progress WHERE student_id = $1 AND video_id = $2"
        );
        sqlx::query_as::<_, VideoProgress>(&query)
            .bind(student_id)
            .bind(video_id)
            .fetch_optional(pool)
            .await
    }

    /// `(completed, total)` video counts for a student across one course.
    ///
    /// `total` counts every video in the course, not just started ones, so
    /// course completion means a completed progress row for each video.
    pub async fn course_video_counts(
        pool: &PgPool,
        student_id: DbId,
        course_id: DbId,
    ) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT \
                 COUNT(*) FILTER (WHERE vp.is_completed) AS completed, \
                 COUNT(*) AS total \
             FROM videos v \
             LEFT JOIN video_progress vp \
                    ON vp.video_id = v.id AND vp.student_id = $1 \
             WHERE v.course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// Per-course rollups for a student's dashboard, covering every course
    /// the student has started at least one video in.
    pub async fn dashboard(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<CourseProgressSummary>, sqlx::Error> {
        sqlx::query_as::<_, CourseProgressSummary>(
            "SELECT c.id AS course_id, \
                    c.title AS course_title, \
                    COUNT(vp.id) AS videos_started, \
                    COUNT(*) FILTER (WHERE vp.is_completed) AS videos_completed, \
                    COALESCE(SUM(vp.watch_time), 0)::BIGINT AS watch_time_seconds, \
                    CASE WHEN COUNT(vp.id) > 0 \
                         THEN COUNT(*) FILTER (WHERE vp.is_completed)::DOUBLE PRECISION \
                              / COUNT(vp.id) * 100 \
                         ELSE 0 END AS completion_percentage \
             FROM video_progress vp \
             JOIN videos v ON v.id = vp.video_id \
             JOIN courses c ON c.id = v.course_id \
             WHERE vp.student_id = $1 \
             GROUP BY c.id, c.title \
             ORDER BY c.title",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }
}
