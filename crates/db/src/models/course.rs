//! Course entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Degree levels a course can belong to.
pub const LEVEL_BACHELOR: &str = "Bachelor";
pub const LEVEL_MASTER: &str = "Master";

/// Semesters a course can run in.
pub const SEMESTER_FIRST: &str = "First";
pub const SEMESTER_SECOND: &str = "Second";
pub const SEMESTER_THIRD: &str = "Third";

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub code: String,
    pub credit: i32,
    pub summary: Option<String>,
    pub program_id: DbId,
    pub level: String,
    pub year: i32,
    pub semester: String,
    pub is_elective: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a course. The slug is generated server-side.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub code: String,
    #[validate(range(min = 0, max = 60))]
    pub credit: i32,
    pub summary: Option<String>,
    pub program_id: DbId,
    pub level: String,
    #[validate(range(min = 1, max = 6))]
    pub year: i32,
    pub semester: String,
    #[serde(default)]
    pub is_elective: bool,
}

/// DTO for updating a course. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourse {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(range(min = 0, max = 60))]
    pub credit: Option<i32>,
    pub summary: Option<String>,
    pub level: Option<String>,
    #[validate(range(min = 1, max = 6))]
    pub year: Option<i32>,
    pub semester: Option<String>,
    pub is_elective: Option<bool>,
}
