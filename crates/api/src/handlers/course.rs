//! Handlers for the `/courses` resource: catalog CRUD, lecturer allocation,
//! and student enrollment.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lms_core::error::CoreError;
use lms_core::slug;
use lms_core::types::DbId;
use lms_db::models::course::{
    Course, CreateCourse, UpdateCourse, LEVEL_BACHELOR, LEVEL_MASTER, SEMESTER_FIRST,
    SEMESTER_SECOND, SEMESTER_THIRD,
};
use lms_db::models::enrollment::EnrolledStudent;
use lms_db::repositories::{
    ActivityLogRepo, CourseRepo, EnrollmentRepo, ProgramRepo, UserRepo,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{validation_error, AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireLecturer, RequireStudent};
use crate::query::{clamp_limit, clamp_offset};
use crate::response::DataResponse;
use crate::state::AppState;

/// Length of the random suffix appended to colliding slugs.
const SLUG_SUFFIX_LEN: usize = 4;

/// Query parameters for `GET /courses`.
#[derive(Debug, Deserialize)]
pub struct CourseListParams {
    /// Free-text search over title, code, summary, and slug.
    pub q: Option<String>,
    /// Restrict to one program.
    pub program_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Reject unknown level / semester values at the boundary.
fn validate_course_enums(level: Option<&str>, semester: Option<&str>) -> AppResult<()> {
    if let Some(level) = level {
        if level != LEVEL_BACHELOR && level != LEVEL_MASTER {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown level '{level}'. Expected '{LEVEL_BACHELOR}' or '{LEVEL_MASTER}'"
            ))));
        }
    }
    if let Some(semester) = semester {
        if semester != SEMESTER_FIRST && semester != SEMESTER_SECOND && semester != SEMESTER_THIRD
        {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown semester '{semester}'"
            ))));
        }
    }
    Ok(())
}

/// Generate a unique course slug from a title.
async fn unique_course_slug(pool: &sqlx::PgPool, title: &str) -> AppResult<String> {
    let base = slug::slugify(title);
    if base.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must contain at least one alphanumeric character".into(),
        )));
    }
    if !CourseRepo::slug_exists(pool, &base).await? {
        return Ok(base);
    }
    Ok(slug::with_suffix(&base, &slug::random_suffix(SLUG_SUFFIX_LEN)))
}

// ---------------------------------------------------------------------------
// Catalog CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/courses
pub async fn list_courses(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<CourseListParams>,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = CourseRepo::list(
        &state.pool,
        params.q.as_deref(),
        params.program_id,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: courses }))
}

/// POST /api/v1/courses
pub async fn create_course(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<DataResponse<Course>>)> {
    input.validate().map_err(|e| validation_error(&e))?;
    validate_course_enums(Some(input.level.as_str()), Some(input.semester.as_str()))?;

    // The referenced program must exist.
    ProgramRepo::find_by_id(&state.pool, input.program_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Program",
            id: input.program_id,
        }))?;

    let slug = unique_course_slug(&state.pool, &input.title).await?;
    let course = CourseRepo::create(&state.pool, &slug, &input).await?;

    ActivityLogRepo::record(
        &state.pool,
        &format!(
            "The course '{} ({})' has been created.",
            course.title, course.code
        ),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// GET /api/v1/courses/{id}
pub async fn get_course(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Course>>> {
    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;
    Ok(Json(DataResponse { data: course }))
}

/// PUT /api/v1/courses/{id}
pub async fn update_course(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<Json<DataResponse<Course>>> {
    input.validate().map_err(|e| validation_error(&e))?;
    validate_course_enums(input.level.as_deref(), input.semester.as_deref())?;

    let course = CourseRepo::update(&state.pool, course_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;

    ActivityLogRepo::record(
        &state.pool,
        &format!(
            "The course '{} ({})' has been updated.",
            course.title, course.code
        ),
    )
    .await?;

    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/courses/{id}
///
/// Deletes the course and, by cascade, its videos, enrollments, and progress
/// records. Returns 204.
pub async fn delete_course(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;

    CourseRepo::delete(&state.pool, course_id).await?;
    ActivityLogRepo::record(
        &state.pool,
        &format!(
            "The course '{} ({})' has been deleted.",
            course.title, course.code
        ),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lecturer allocation
// ---------------------------------------------------------------------------

/// POST /api/v1/courses/{id}/lecturers/{lecturer_id}
///
/// Assign a lecturer to the course. Returns 201, or 409 via the unique
/// constraint when already assigned.
pub async fn allocate_lecturer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((course_id, lecturer_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;
    let lecturer = UserRepo::find_by_id(&state.pool, lecturer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: lecturer_id,
        }))?;

    let created = CourseRepo::allocate_lecturer(&state.pool, lecturer.id, course_id).await?;
    if !created {
        return Err(AppError::Core(CoreError::Conflict(
            "Lecturer is already allocated to this course".into(),
        )));
    }
    Ok(StatusCode::CREATED)
}

/// DELETE /api/v1/courses/{id}/lecturers/{lecturer_id}
pub async fn deallocate_lecturer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((course_id, lecturer_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let removed = CourseRepo::deallocate_lecturer(&state.pool, lecturer_id, course_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CourseAllocation",
            id: course_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Enrollment
// ---------------------------------------------------------------------------

/// POST /api/v1/courses/{id}/enroll
///
/// Enroll the authenticated student. Idempotent: re-enrolling returns 200.
pub async fn enroll(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;

    let created = EnrollmentRepo::enroll(&state.pool, student.user_id, course_id).await?;
    if created {
        ActivityLogRepo::record(
            &state.pool,
            &format!("A student has enrolled in the course '{}'.", course.title),
        )
        .await?;
    }

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(serde_json::json!({ "data": { "enrolled": true } })),
    ))
}

/// DELETE /api/v1/courses/{id}/enroll
///
/// Drop the authenticated student's enrollment. Returns 204.
pub async fn unenroll(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = EnrollmentRepo::unenroll(&state.pool, student.user_id, course_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Enrollment",
            id: course_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/courses/{id}/students
///
/// Roster of enrolled students, for lecturers and admins.
pub async fn list_students(
    RequireLecturer(_lecturer): RequireLecturer,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EnrolledStudent>>>> {
    CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;

    let students = EnrollmentRepo::list_students_for_course(&state.pool, course_id).await?;
    Ok(Json(DataResponse { data: students }))
}

/// GET /api/v1/courses/enrolled
///
/// The authenticated student's enrolled courses, newest enrollment first.
pub async fn my_courses(
    RequireStudent(student): RequireStudent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = EnrollmentRepo::list_courses_for_student(&state.pool, student.user_id).await?;
    Ok(Json(DataResponse { data: courses }))
}
