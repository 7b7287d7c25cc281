//! Linked external identity model.

use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `social_accounts` table.
///
/// `(provider, subject)` is unique: one external identity links to exactly
/// one local account.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocialAccount {
    pub id: DbId,
    pub user_id: DbId,
    pub provider: String,
    pub subject: String,
    pub email: Option<String>,
    pub created_at: Timestamp,
}
