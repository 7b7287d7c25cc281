//! Repository for the `courses` and `course_allocations` tables.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse, UpdateCourse};

/// Column list for `courses` queries.
const COLUMNS: &str = "id, slug, title, code, credit, summary, program_id, level, year, \
     semester, is_elective, created_at, updated_at";

/// Provides CRUD operations for courses and lecturer allocations.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a course with a pre-generated slug.
    pub async fn create(
        pool: &PgPool,
        slug: &str,
        input: &CreateCourse,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (slug, title, code, credit, summary, program_id, level, year, semester, is_elective) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(slug)
            .bind(&input.title)
            .bind(&input.code)
            .bind(input.credit)
            .bind(input.summary.as_deref())
            .bind(input.program_id)
            .bind(&input.level)
            .bind(input.year)
            .bind(&input.semester)
            .bind(input.is_elective)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List courses with optional free-text search (title, code, summary,
    /// slug) and optional program filter.
    pub async fn list(
        pool: &PgPool,
        q: Option<&str>,
        program_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Course>, sqlx::Error> {
        let mut filters = String::new();
        let mut next_param = 3;
        if q.is_some() {
            filters.push_str(&format!(
                " AND (title ILIKE ${next_param} OR code ILIKE ${next_param} \
                 OR summary ILIKE ${next_param} OR slug ILIKE ${next_param})"
            ));
            next_param += 1;
        }
        if program_id.is_some() {
            filters.push_str(&format!(" AND program_id = ${next_param}"));
        }

        let query = format!(
            "SELECT {COLUMNS} FROM courses \
             WHERE TRUE{filters} \
             ORDER BY title \
             LIMIT $1 OFFSET $2"
        );
        let mut query_as = sqlx::query_as::<_, Course>(&query).bind(limit).bind(offset);
        if let Some(q) = q {
            query_as = query_as.bind(format!("%{q}%"));
        }
        if let Some(program_id) = program_id {
            query_as = query_as.bind(program_id);
        }
        query_as.fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET \
                 title = COALESCE($2, title), \
                 credit = COALESCE($3, credit), \
                 summary = COALESCE($4, summary), \
                 level = COALESCE($5, level), \
                 year = COALESCE($6, year), \
                 semester = COALESCE($7, semester), \
                 is_elective = COALESCE($8, is_elective), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.credit)
            .bind(input.summary.as_deref())
            .bind(input.level.as_deref())
            .bind(input.year)
            .bind(input.semester.as_deref())
            .bind(input.is_elective)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course and (by cascade) its videos, enrollments, and
    /// progress records. Returns `false` if the course was not found.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM courses WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(exists.is_some())
    }

    // -----------------------------------------------------------------------
    // Lecturer allocations
    // -----------------------------------------------------------------------

    /// Assign a lecturer to a course. Returns `false` when the allocation
    /// already existed.
    pub async fn allocate_lecturer(
        pool: &PgPool,
        lecturer_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO course_allocations (lecturer_id, course_id) \
             VALUES ($1, $2) \
             ON CONFLICT (lecturer_id, course_id) DO NOTHING",
        )
        .bind(lecturer_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a lecturer's allocation. Returns `false` if none existed.
    pub async fn deallocate_lecturer(
        pool: &PgPool,
        lecturer_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM course_allocations WHERE lecturer_id = $1 AND course_id = $2")
                .bind(lecturer_id)
                .bind(course_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a lecturer is allocated to a course.
    pub async fn is_allocated(
        pool: &PgPool,
        lecturer_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM course_allocations WHERE lecturer_id = $1 AND course_id = $2",
        )
        .bind(lecturer_id)
        .bind(course_id)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }
}
