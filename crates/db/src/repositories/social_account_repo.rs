//! Repository for the `social_accounts` table.

use lms_core::types::DbId;
use sqlx::PgPool;

use crate::models::social_account::SocialAccount;

/// Column list for `social_accounts` queries.
const COLUMNS: &str = "id, user_id, provider, subject, email, created_at";

/// Provides storage for linked external identities.
pub struct SocialAccountRepo;

impl SocialAccountRepo {
    /// Find the link for an external `(provider, subject)` pair.
    pub async fn find_by_identity(
        pool: &PgPool,
        provider: &str,
        subject: &str,
    ) -> Result<Option<SocialAccount>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM social_accounts WHERE provider = $1 AND subject = $2");
        sqlx::query_as::<_, SocialAccount>(&query)
            .bind(provider)
            .bind(subject)
            .fetch_optional(pool)
            .await
    }

    /// Link an external identity to a local account (idempotent upsert:
    /// re-linking the same pair refreshes the email snapshot).
    pub async fn link(
        pool: &PgPool,
        user_id: DbId,
        provider: &str,
        subject: &str,
        email: Option<&str>,
    ) -> Result<SocialAccount, sqlx::Error> {
        let query = format!(
            "INSERT INTO social_accounts (user_id, provider, subject, email) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (provider, subject) DO UPDATE SET email = EXCLUDED.email \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SocialAccount>(&query)
            .bind(user_id)
            .bind(provider)
            .bind(subject)
            .bind(email)
            .fetch_one(pool)
            .await
    }
}
