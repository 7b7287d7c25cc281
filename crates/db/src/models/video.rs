//! Video lecture entity model and DTOs.
//!
//! A video is either file-backed (`file_path`) or YouTube-embedded
//! (`youtube_url`); exactly one source must be present, enforced at the
//! boundary and by a table check constraint.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub course_id: DbId,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub youtube_url: Option<String>,
    pub file_path: Option<String>,
    pub is_youtube: bool,
    pub duration_seconds: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    /// Embeddable player URL for YouTube-backed videos.
    pub fn youtube_embed_url(&self) -> Option<String> {
        self.youtube_url
            .as_deref()
            .and_then(lms_core::youtube::embed_url)
    }
}

/// DTO for creating a video. The slug is generated server-side and
/// `is_youtube` is derived from the presence of `youtube_url`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVideo {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    pub summary: Option<String>,
    #[validate(url)]
    pub youtube_url: Option<String>,
    pub file_path: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub duration_seconds: i32,
}

/// DTO for updating a video. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVideo {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    pub summary: Option<String>,
    #[validate(url)]
    pub youtube_url: Option<String>,
    pub file_path: Option<String>,
    #[validate(range(min = 0))]
    pub duration_seconds: Option<i32>,
}
