//! Handlers for the `/admin` resource (user management, activity feed).
//!
//! All endpoints require the admin role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lms_core::credentials::{self, LECTURER_PREFIX, STUDENT_PREFIX};
use lms_core::error::CoreError;
use lms_core::notification;
use lms_core::roles::{ROLE_LECTURER, ROLE_PARENT, ROLE_STUDENT};
use lms_core::types::DbId;
use lms_db::models::user::{CreateUser, UpdateUser, UserResponse};
use lms_db::repositories::{
    ActivityLogRepo, NotificationPreferenceRepo, NotificationRepo, RoleRepo, UserRepo,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::auth::social::unique_registration_number;
use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{clamp_limit, clamp_offset};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`. Username and password are generated
/// server-side; only profile fields and the role are supplied.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    /// One of `student`, `lecturer`, `parent`.
    pub role: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub last_name: String,
}

/// Response for `POST /admin/users`: the created account plus its one-time
/// generated credentials.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub user: UserResponse,
    /// Generated registration number; this is the login username.
    pub username: String,
    /// Generated initial password, shown exactly once.
    pub password: String,
}

/// Query parameters for `GET /admin/users`.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    /// Optional role-name filter.
    pub role: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /admin/activity`.
#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    pub limit: Option<i64>,
}

/// Default number of activity entries returned.
const DEFAULT_ACTIVITY_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// User management
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
///
/// Create a student, lecturer, or parent account with generated credentials.
/// The defaulted notification preferences and the welcome notification are
/// created in the same request.
pub async fn create_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedUserResponse>>)> {
    input.validate().map_err(|e| validation_error(&e))?;

    let prefix = match input.role.as_str() {
        ROLE_STUDENT => STUDENT_PREFIX,
        ROLE_LECTURER => LECTURER_PREFIX,
        ROLE_PARENT => "par",
        other => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Cannot create accounts with role '{other}'"
            ))));
        }
    };

    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{}' is not seeded", input.role)))?;

    let username = unique_registration_number(&state.pool, prefix).await?;
    let password = credentials::random_password();
    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.clone(),
            email: input.email,
            password_hash,
            role_id: role.id,
            first_name: input.first_name,
            last_name: input.last_name,
        },
    )
    .await?;

    NotificationPreferenceRepo::ensure_defaults(&state.pool, user.id).await?;
    NotificationRepo::create(&state.pool, user.id, &notification::welcome(), None, None).await?;
    ActivityLogRepo::record(
        &state.pool,
        &format!("The {} account '{}' has been created.", role.name, username),
    )
    .await?;

    tracing::info!(user_id = user.id, role = %role.name, "Account created");

    let response = UserRepo::find_response_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created user vanished".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedUserResponse {
                user: response,
                username,
                password,
            },
        }),
    ))
}

/// GET /api/v1/admin/users
///
/// List accounts, optionally filtered by role name.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(
        &state.pool,
        params.role.as_deref(),
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_response_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Patch profile fields or the active flag.
pub async fn update_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    UserRepo::update(&state.pool, user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let response = UserRepo::find_response_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::InternalError("Updated user vanished".into()))?;

    Ok(Json(DataResponse { data: response }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivate an account. Returns 204 No Content.
pub async fn deactivate_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = UserRepo::deactivate(&state.pool, user_id).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }
    tracing::info!(user_id, "Account deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Activity feed
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/activity
///
/// Most recent platform activity entries, newest first.
pub async fn recent_activity(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ActivityParams>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, 500);
    let entries = ActivityLogRepo::recent(&state.pool, limit).await?;
    Ok(Json(serde_json::json!({ "data": entries })))
}
