//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication; the broadcast endpoint requires
//! the admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::notification::{self, NotificationType, Priority};
use lms_core::roles::ROLE_STUDENT;
use lms_core::types::DbId;
use lms_db::models::notification::{NotificationPreference, UpdatePreferences, DIGEST_FREQUENCIES};
use lms_db::repositories::{NotificationPreferenceRepo, NotificationRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{clamp_limit, clamp_offset};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    /// Optional type filter (`progress_update`, `announcement`, ...).
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Request body for `POST /notifications/announcements`.
#[derive(Debug, Deserialize, Validate)]
pub struct AnnouncementRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    /// Defaults to `medium`.
    pub priority: Option<String>,
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// List the authenticated user's notifications, newest first, with the
/// current unread count alongside.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);
    let unread_only = params.unread_only.unwrap_or(false);

    // Reject unknown type filters instead of silently returning nothing.
    let type_filter = match params.notification_type.as_deref() {
        Some(raw) => Some(
            raw.parse::<NotificationType>()
                .map_err(AppError::BadRequest)?,
        ),
        None => None,
    };

    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        unread_only,
        type_filter.map(|t| t.as_str()),
        limit,
        offset,
    )
    .await?;
    let unread_count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": notifications,
        "unread_count": unread_count,
    })))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark one notification as read. 404 if it does not exist, 403 if it is
/// owned by another recipient. Idempotent: re-marking leaves `read_at`
/// untouched and returns the same state.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let existing = NotificationRepo::find_by_id(&state.pool, notification_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }))?;

    if existing.recipient_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Notification belongs to another recipient".into(),
        )));
    }

    // Already read: no-op returning the unchanged row.
    let notification = if existing.is_read {
        existing
    } else {
        NotificationRepo::mark_read(&state.pool, notification_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Notification",
                id: notification_id,
            }))?
    };

    Ok(Json(serde_json::json!({ "data": notification })))
}

/// POST /api/v1/notifications/read-all
///
/// Mark every unread notification as read. Returns the number marked.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

/// DELETE /api/v1/notifications/{id}
///
/// Delete one of the recipient's notifications. Returns 204.
pub async fn delete_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = NotificationRepo::find_by_id(&state.pool, notification_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }))?;

    if existing.recipient_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Notification belongs to another recipient".into(),
        )));
    }

    NotificationRepo::delete(&state.pool, notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/preferences
///
/// The authenticated user's preference row, created with defaults on first
/// access.
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<NotificationPreference>>> {
    let prefs = NotificationPreferenceRepo::get_or_create(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: prefs }))
}

/// PUT /api/v1/notifications/preferences
pub async fn update_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdatePreferences>,
) -> AppResult<Json<DataResponse<NotificationPreference>>> {
    if let Some(freq) = input.digest_frequency.as_deref() {
        if !DIGEST_FREQUENCIES.contains(&freq) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown digest_frequency '{freq}'"
            ))));
        }
    }

    let prefs = NotificationPreferenceRepo::update(&state.pool, auth.user_id, &input).await?;
    Ok(Json(DataResponse { data: prefs }))
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

/// POST /api/v1/notifications/announcements
///
/// Admin-only: fan an announcement out to every active student in a single
/// batch insert. Returns the number of notifications created.
///
/// Recipient preference flags are not consulted here; callers that want
/// filtering must narrow the recipient set first.
pub async fn create_announcement(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<AnnouncementRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    input.validate().map_err(|e| validation_error(&e))?;

    let priority = match input.priority.as_deref() {
        Some(raw) => raw.parse::<Priority>().map_err(AppError::BadRequest)?,
        None => Priority::Medium,
    };

    let recipients = UserRepo::list_active_ids_by_role(&state.pool, ROLE_STUDENT).await?;
    let draft = notification::announcement(&input.title, &input.message, priority);
    let count = NotificationRepo::broadcast(&state.pool, &recipients, &draft).await?;

    tracing::info!(count, "Announcement broadcast to students");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "data": { "created": count }
        })),
    ))
}
