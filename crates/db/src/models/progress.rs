//! Watch-progress entity model and derived views.

use lms_core::progress::format_watch_time;
use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `video_progress` table. One per (student, video) pair.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoProgress {
    pub id: DbId,
    pub student_id: DbId,
    pub video_id: DbId,
    pub watch_time: i64,
    pub total_duration: i64,
    pub last_position: i64,
    pub completion_percentage: f64,
    pub is_completed: bool,
    pub first_watched_at: Timestamp,
    pub last_watched_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// Player-facing snapshot relayed back after each progress update.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub completion_percentage: f64,
    pub is_completed: bool,
    pub watch_time: i64,
    pub last_position: i64,
    pub total_duration: i64,
    pub time_watched_display: String,
    pub progress_display: String,
}

impl ProgressSnapshot {
    /// Snapshot for a pair with no progress row yet.
    pub fn empty() -> Self {
        Self {
            completion_percentage: 0.0,
            is_completed: false,
            watch_time: 0,
            last_position: 0,
            total_duration: 0,
            time_watched_display: format_watch_time(0),
            progress_display: "0.0%".to_string(),
        }
    }
}

impl From<&VideoProgress> for ProgressSnapshot {
    fn from(row: &VideoProgress) -> Self {
        Self {
            completion_percentage: row.completion_percentage,
            is_completed: row.is_completed,
            watch_time: row.watch_time,
            last_position: row.last_position,
            total_duration: row.total_duration,
            time_watched_display: format_watch_time(row.watch_time),
            progress_display: format!("{:.1}%", row.completion_percentage),
        }
    }
}

/// Per-course rollup row for the student progress dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseProgressSummary {
    pub course_id: DbId,
    pub course_title: String,
    pub videos_started: i64,
    pub videos_completed: i64,
    pub watch_time_seconds: i64,
    /// Completed videos as a percentage of videos started in this course.
    pub completion_percentage: f64,
}

/// Aggregate dashboard for one student.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressDashboard {
    pub courses: Vec<CourseProgressSummary>,
    pub total_videos: i64,
    pub completed_videos: i64,
    pub total_watch_time: i64,
    pub overall_completion: f64,
}
