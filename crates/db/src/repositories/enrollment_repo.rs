//! Repository for the `enrollments` table.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::Course;
use crate::models::enrollment::EnrolledStudent;

/// Provides enrollment management for students and courses.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a student. Returns `false` when the enrollment already existed.
    pub async fn enroll(
        pool: &PgPool,
        student_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO enrollments (student_id, course_id) \
             VALUES ($1, $2) \
             ON CONFLICT (student_id, course_id) DO NOTHING",
        )
        .bind(student_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop an enrollment. Returns `false` if none existed.
    pub async fn unenroll(
        pool: &PgPool,
        student_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM enrollments WHERE student_id = $1 AND course_id = $2")
                .bind(student_id)
                .bind(course_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Students enrolled in a course, oldest enrollment first.
    pub async fn list_students_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<EnrolledStudent>, sqlx::Error> {
        sqlx::query_as::<_, EnrolledStudent>(
            "SELECT e.student_id, u.username, u.email, u.first_name, u.last_name, e.enrolled_at \
             FROM enrollments e \
             JOIN users u ON u.id = e.student_id \
             WHERE e.course_id = $1 \
             ORDER BY e.enrolled_at",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Courses a student is enrolled in, newest enrollment first.
    pub async fn list_courses_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "SELECT c.id, c.slug, c.title, c.code, c.credit, c.summary, c.program_id, c.level, \
                    c.year, c.semester, c.is_elective, c.created_at, c.updated_at \
             FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             WHERE e.student_id = $1 \
             ORDER BY e.enrolled_at DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }
}
