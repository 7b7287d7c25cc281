//! Handlers for the `/programs` resource.
//!
//! Reads are open to any authenticated user; mutations are admin-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::types::DbId;
use lms_db::models::program::{CreateProgram, Program, UpdateProgram};
use lms_db::repositories::{ActivityLogRepo, ProgramRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /programs`.
#[derive(Debug, Deserialize)]
pub struct ProgramListParams {
    /// Free-text search over title and summary.
    pub q: Option<String>,
}

/// GET /api/v1/programs
pub async fn list_programs(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ProgramListParams>,
) -> AppResult<Json<DataResponse<Vec<Program>>>> {
    let programs = ProgramRepo::list(&state.pool, params.q.as_deref()).await?;
    Ok(Json(DataResponse { data: programs }))
}

/// POST /api/v1/programs
pub async fn create_program(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProgram>,
) -> AppResult<(StatusCode, Json<DataResponse<Program>>)> {
    input.validate().map_err(|e| validation_error(&e))?;

    let program = ProgramRepo::create(&state.pool, &input).await?;
    ActivityLogRepo::record(
        &state.pool,
        &format!("The program '{}' has been created.", program.title),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: program })))
}

/// GET /api/v1/programs/{id}
pub async fn get_program(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(program_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Program>>> {
    let program = ProgramRepo::find_by_id(&state.pool, program_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Program",
            id: program_id,
        }))?;
    Ok(Json(DataResponse { data: program }))
}

/// PUT /api/v1/programs/{id}
pub async fn update_program(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(program_id): Path<DbId>,
    Json(input): Json<UpdateProgram>,
) -> AppResult<Json<DataResponse<Program>>> {
    input.validate().map_err(|e| validation_error(&e))?;

    let program = ProgramRepo::update(&state.pool, program_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Program",
            id: program_id,
        }))?;

    ActivityLogRepo::record(
        &state.pool,
        &format!("The program '{}' has been updated.", program.title),
    )
    .await?;

    Ok(Json(DataResponse { data: program }))
}

/// DELETE /api/v1/programs/{id}
///
/// Deletes the program and, by cascade, its courses. Returns 204.
pub async fn delete_program(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(program_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let program = ProgramRepo::find_by_id(&state.pool, program_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Program",
            id: program_id,
        }))?;

    ProgramRepo::delete(&state.pool, program_id).await?;
    ActivityLogRepo::record(
        &state.pool,
        &format!("The program '{}' has been deleted.", program.title),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
