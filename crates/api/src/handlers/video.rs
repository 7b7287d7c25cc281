//! Handlers for video lectures (`/courses/{id}/videos` and `/videos/{id}`).
//!
//! A video is either file-backed or YouTube-embedded. Responses include the
//! derived embed URL so the player never reconstructs it client-side.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::slug;
use lms_core::types::DbId;
use lms_core::youtube;
use lms_db::models::video::{CreateVideo, UpdateVideo, Video};
use lms_db::repositories::{ActivityLogRepo, CourseRepo, VideoRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireLecturer};
use crate::response::DataResponse;
use crate::state::AppState;

/// Length of the random suffix appended to colliding slugs.
const SLUG_SUFFIX_LEN: usize = 4;

/// Video plus derived presentation fields.
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    #[serde(flatten)]
    pub video: Video,
    /// Restricted-player embed URL for YouTube-backed videos.
    pub youtube_embed_url: Option<String>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        let youtube_embed_url = video.youtube_embed_url();
        Self {
            video,
            youtube_embed_url,
        }
    }
}

/// Reject sourceless or unparseable video inputs at the boundary.
fn validate_video_source(
    youtube_url: Option<&str>,
    file_path: Option<&str>,
    require_source: bool,
) -> AppResult<()> {
    if require_source && youtube_url.is_none() && file_path.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Either youtube_url or file_path must be provided".into(),
        )));
    }
    if let Some(url) = youtube_url {
        if youtube::extract_video_id(url).is_none() {
            return Err(AppError::Core(CoreError::Validation(
                "youtube_url is not a recognizable YouTube video URL".into(),
            )));
        }
    }
    Ok(())
}

/// Generate a unique video slug from a title.
async fn unique_video_slug(pool: &sqlx::PgPool, title: &str) -> AppResult<String> {
    let base = slug::slugify(title);
    if base.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must contain at least one alphanumeric character".into(),
        )));
    }
    if !VideoRepo::slug_exists(pool, &base).await? {
        return Ok(base);
    }
    Ok(slug::with_suffix(&base, &slug::random_suffix(SLUG_SUFFIX_LEN)))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/courses/{id}/videos
pub async fn list_videos(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<VideoResponse>>>> {
    CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;

    let videos = VideoRepo::list_for_course(&state.pool, course_id).await?;
    Ok(Json(DataResponse {
        data: videos.into_iter().map(VideoResponse::from).collect(),
    }))
}

/// POST /api/v1/courses/{id}/videos
///
/// Upload a lecture. Lecturers must be allocated to the course; admins may
/// upload anywhere.
pub async fn create_video(
    RequireLecturer(lecturer): RequireLecturer,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<CreateVideo>,
) -> AppResult<(StatusCode, Json<DataResponse<VideoResponse>>)> {
    input.validate().map_err(|e| validation_error(&e))?;
    validate_video_source(input.youtube_url.as_deref(), input.file_path.as_deref(), true)?;

    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;

    if lecturer.role == lms_core::roles::ROLE_LECTURER
        && !CourseRepo::is_allocated(&state.pool, lecturer.user_id, course_id).await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not allocated to this course".into(),
        )));
    }

    let slug = unique_video_slug(&state.pool, &input.title).await?;
    let video = VideoRepo::create(&state.pool, course_id, &slug, &input).await?;

    ActivityLogRepo::record(
        &state.pool,
        &format!(
            "The video '{}' has been uploaded to the course '{}'.",
            video.title, course.title
        ),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: VideoResponse::from(video),
        }),
    ))
}

/// GET /api/v1/videos/{id}
pub async fn get_video(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoResponse>>> {
    let video = VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;
    Ok(Json(DataResponse {
        data: VideoResponse::from(video),
    }))
}

/// PUT /api/v1/videos/{id}
pub async fn update_video(
    RequireLecturer(lecturer): RequireLecturer,
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
    Json(input): Json<UpdateVideo>,
) -> AppResult<Json<DataResponse<VideoResponse>>> {
    input.validate().map_err(|e| validation_error(&e))?;
    validate_video_source(input.youtube_url.as_deref(), input.file_path.as_deref(), false)?;

    let existing = VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;

    if lecturer.role == lms_core::roles::ROLE_LECTURER
        && !CourseRepo::is_allocated(&state.pool, lecturer.user_id, existing.course_id).await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not allocated to this course".into(),
        )));
    }

    let video = VideoRepo::update(&state.pool, video_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;

    ActivityLogRepo::record(
        &state.pool,
        &format!("The video '{}' has been updated.", video.title),
    )
    .await?;

    Ok(Json(DataResponse {
        data: VideoResponse::from(video),
    }))
}

/// DELETE /api/v1/videos/{id}
///
/// Deletes the video and, by cascade, its progress records. Returns 204.
pub async fn delete_video(
    RequireLecturer(lecturer): RequireLecturer,
    State(state): State<AppState>,
    Path(video_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let video = VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;

    if lecturer.role == lms_core::roles::ROLE_LECTURER
        && !CourseRepo::is_allocated(&state.pool, lecturer.user_id, video.course_id).await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not allocated to this course".into(),
        )));
    }

    VideoRepo::delete(&state.pool, video_id).await?;
    ActivityLogRepo::record(
        &state.pool,
        &format!("The video '{}' has been deleted.", video.title),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
