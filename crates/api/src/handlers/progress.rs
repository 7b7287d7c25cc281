//! Handlers for the `/progress` resource: heartbeat recording, snapshot
//! reads, and the per-student dashboard.
//!
//! Notification side effects are explicit calls made here, from the
//! transition the recorder reports: a completion produces a video-completion
//! notification (and a course-completion one when the whole course is done),
//! a first crossing of 50% produces an encouragement notification.

use axum::extract::{Path, State};
use axum::Json;
use lms_core::error::CoreError;
use lms_core::notification;
use lms_core::progress::validate_heartbeat;
use lms_core::types::DbId;
use lms_db::models::progress::{ProgressDashboard, ProgressSnapshot};
use lms_db::models::video::Video;
use lms_db::repositories::{
    ActivityLogRepo, CourseRepo, NotificationRepo, ProgressRepo, UserRepo, VideoRepo,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStudent;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /progress/videos/{video_id}` -- one player
/// heartbeat. Missing fields default to zero, matching players that only
/// report a position.
#[derive(Debug, Deserialize)]
pub struct ProgressUpdateRequest {
    #[serde(default)]
    pub current_time: i64,
    #[serde(default)]
    pub duration: i64,
}

/// POST /api/v1/progress/videos/{video_id}
///
/// Record a watch-progress heartbeat for the authenticated student and
/// return the updated snapshot for the player UI.
pub async fn update_progress(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
    Json(input): Json<ProgressUpdateRequest>,
) -> AppResult<Json<DataResponse<ProgressSnapshot>>> {
    validate_heartbeat(input.current_time, input.duration).map_err(AppError::Core)?;

    let video = VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;

    let recorded = ProgressRepo::record(
        &state.pool,
        student.user_id,
        video.id,
        input.current_time,
        input.duration,
    )
    .await?;

    if recorded.started {
        log_watch_event(&state, student.user_id, &video, "started").await?;
    }

    if recorded.transition.completed {
        on_video_completed(&state, student.user_id, &video).await?;
    } else if recorded.transition.crossed_halfway {
        if let Some(draft) =
            notification::progress_milestone(&video.title, recorded.row.completion_percentage)
        {
            let draft = draft.with_action_url(video_url(&state, &video).await?);
            NotificationRepo::create(
                &state.pool,
                student.user_id,
                &draft,
                Some(video.course_id),
                Some(video.id),
            )
            .await?;
        }
    }

    Ok(Json(DataResponse {
        data: ProgressSnapshot::from(&recorded.row),
    }))
}

/// GET /api/v1/progress/videos/{video_id}
///
/// The authenticated student's snapshot for one video. A pair with no
/// progress row yet yields a zeroed snapshot, not a 404; only a missing
/// video is an error.
pub async fn get_progress(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProgressSnapshot>>> {
    VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;

    let snapshot = ProgressRepo::find(&state.pool, student.user_id, video_id)
        .await?
        .map(|row| ProgressSnapshot::from(&row))
        .unwrap_or_else(ProgressSnapshot::empty);

    Ok(Json(DataResponse { data: snapshot }))
}

/// GET /api/v1/progress/dashboard
///
/// Per-course rollups plus overall totals for the authenticated student.
pub async fn dashboard(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProgressDashboard>>> {
    let courses = ProgressRepo::dashboard(&state.pool, student.user_id).await?;

    let total_videos: i64 = courses.iter().map(|c| c.videos_started).sum();
    let completed_videos: i64 = courses.iter().map(|c| c.videos_completed).sum();
    let total_watch_time: i64 = courses.iter().map(|c| c.watch_time_seconds).sum();
    let overall_completion = if total_videos > 0 {
        completed_videos as f64 / total_videos as f64 * 100.0
    } else {
        0.0
    };

    Ok(Json(DataResponse {
        data: ProgressDashboard {
            courses,
            total_videos,
            completed_videos,
            total_watch_time,
            overall_completion,
        },
    }))
}

// ---------------------------------------------------------------------------
// Side effects
// ---------------------------------------------------------------------------

/// Completion side effects: video-completion notification, activity entry,
/// and a course-completion notification when every video in the course now
/// has a completed progress row.
async fn on_video_completed(state: &AppState, student_id: DbId, video: &Video) -> AppResult<()> {
    let course = CourseRepo::find_by_id(&state.pool, video.course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: video.course_id,
        }))?;

    let draft = notification::video_completed(&video.title, &course.title)
        .with_action_url(format!("/courses/{}", course.slug));
    NotificationRepo::create(
        &state.pool,
        student_id,
        &draft,
        Some(course.id),
        Some(video.id),
    )
    .await?;

    log_watch_event(state, student_id, video, "completed").await?;

    let (completed, total) = ProgressRepo::course_video_counts(&state.pool, student_id, course.id)
        .await?;
    if total > 0 && completed >= total {
        let draft = notification::course_completed(&course.title)
            .with_action_url(format!("/courses/{}", course.slug));
        NotificationRepo::create(&state.pool, student_id, &draft, Some(course.id), None).await?;
        tracing::info!(student_id, course_id = course.id, "Course completed");
    }

    Ok(())
}

/// Deep link to a video's player page.
async fn video_url(state: &AppState, video: &Video) -> AppResult<String> {
    let course = CourseRepo::find_by_id(&state.pool, video.course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: video.course_id,
        }))?;
    Ok(format!("/courses/{}/videos/{}", course.slug, video.slug))
}

/// Append a started/completed activity entry for a watch transition.
async fn log_watch_event(
    state: &AppState,
    student_id: DbId,
    video: &Video,
    verb: &str,
) -> AppResult<()> {
    let username = UserRepo::find_by_id(&state.pool, student_id)
        .await?
        .map(|u| u.username)
        .unwrap_or_else(|| student_id.to_string());
    ActivityLogRepo::record(
        &state.pool,
        &format!("Student '{username}' {verb} watching '{}'.", video.title),
    )
    .await?;
    Ok(())
}
