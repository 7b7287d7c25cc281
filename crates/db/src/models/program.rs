//! Program (degree programme) entity model and DTOs.

use lms_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `programs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Program {
    pub id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a program.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProgram {
    #[validate(length(min = 1, max = 150))]
    pub title: String,
    pub summary: Option<String>,
}

/// DTO for updating a program. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProgram {
    #[validate(length(min = 1, max = 150))]
    pub title: Option<String>,
    pub summary: Option<String>,
}
