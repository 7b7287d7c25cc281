//! Repository for the `videos` table.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::video::{CreateVideo, UpdateVideo, Video};

/// Column list for `videos` queries.
const COLUMNS: &str = "id, course_id, slug, title, summary, youtube_url, file_path, \
     is_youtube, duration_seconds, created_at, updated_at";

/// Provides CRUD operations for video lectures.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a video with a pre-generated slug. `is_youtube` is derived
    /// from the presence of a YouTube URL.
    pub async fn create(
        pool: &PgPool,
        course_id: DbId,
        slug: &str,
        input: &CreateVideo,
    ) -> Result<Video, sqlx::Error> {
        let is_youtube = input.youtube_url.is_some();
        let query = format!(
            "INSERT INTO videos (course_id, slug, title, summary, youtube_url, file_path, is_youtube, duration_seconds) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(course_id)
            .bind(slug)
            .bind(&input.title)
            .bind(input.summary.as_deref())
            .bind(input.youtube_url.as_deref())
            .bind(input.file_path.as_deref())
            .bind(is_youtube)
            .bind(input.duration_seconds)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a course's videos in upload order.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos WHERE course_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Patch a video. `is_youtube` follows any change to the YouTube URL.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET \
                 title = COALESCE($2, title), \
                 summary = COALESCE($3, summary), \
                 youtube_url = COALESCE($4, youtube_url), \
                 file_path = COALESCE($5, file_path), \
                 duration_seconds = COALESCE($6, duration_seconds), \
                 is_youtube = (COALESCE($4, youtube_url) IS NOT NULL), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.summary.as_deref())
            .bind(input.youtube_url.as_deref())
            .bind(input.file_path.as_deref())
            .bind(input.duration_seconds)
            .fetch_optional(pool)
            .await
    }

    /// Delete a video and (by cascade) its progress records. Returns `false`
    /// if the video was not found.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM videos WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(exists.is_some())
    }
}
