//! Enrollment join models.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Join row for listing a course's enrolled students.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnrolledStudent {
    pub student_id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub enrolled_at: Timestamp,
}
