//! Social login via an explicit identity-linking strategy.
//!
//! The OAuth provider authenticates the user; this module only decides which
//! local account an external identity maps to. [`IdentityLinker`] is the
//! strategy seam: given verified claims, return the linked account, linking
//! or creating one as needed. Side effects (preference defaults, welcome
//! notification, activity entry) are explicit calls inside the strategy,
//! visible in the call graph.

use async_trait::async_trait;
use chrono::Datelike;
use lms_core::credentials::{self, STUDENT_PREFIX};
use lms_core::error::CoreError;
use lms_core::notification;
use lms_core::roles::ROLE_STUDENT;
use lms_db::models::user::{CreateUser, User};
use lms_db::repositories::{
    ActivityLogRepo, NotificationPreferenceRepo, NotificationRepo, RoleRepo, SocialAccountRepo,
    UserRepo,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Provider name stored on `social_accounts` rows for Google identities.
pub const PROVIDER_GOOGLE: &str = "google";

/// Google's ID-token introspection endpoint.
const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Attempts at generating an unused registration number before giving up.
const MAX_USERNAME_ATTEMPTS: usize = 8;

/// Verified identity claims handed to the linker.
///
/// Produced only after provider-side verification; the linker trusts them.
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    pub provider: String,
    /// The provider's stable subject identifier.
    pub subject: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Strategy for resolving an external identity to a local account.
#[async_trait]
pub trait IdentityLinker: Send + Sync {
    /// Return the account for `claims`, linking an existing account by email
    /// or creating a fresh student account when none matches.
    async fn link_or_create(&self, pool: &PgPool, claims: &IdentityClaims) -> AppResult<User>;
}

/// Default linker: match by `(provider, subject)`, then by email, else
/// create a student account with generated credentials.
pub struct SocialAccountLinker;

#[async_trait]
impl IdentityLinker for SocialAccountLinker {
    async fn link_or_create(&self, pool: &PgPool, claims: &IdentityClaims) -> AppResult<User> {
        // 1. An existing link wins.
        if let Some(link) =
            SocialAccountRepo::find_by_identity(pool, &claims.provider, &claims.subject).await?
        {
            return UserRepo::find_by_id(pool, link.user_id).await?.ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Linked account no longer exists".into(),
                ))
            });
        }

        // 2. Same email: connect the external identity to the existing account.
        if let Some(user) = UserRepo::find_by_email(pool, &claims.email).await? {
            SocialAccountRepo::link(
                pool,
                user.id,
                &claims.provider,
                &claims.subject,
                Some(&claims.email),
            )
            .await?;
            tracing::info!(
                user_id = user.id,
                provider = %claims.provider,
                "Connected social identity to existing account"
            );
            return Ok(user);
        }

        // 3. First contact: create a student account with generated credentials.
        let role = RoleRepo::find_by_name(pool, ROLE_STUDENT)
            .await?
            .ok_or_else(|| AppError::InternalError("student role missing from seed data".into()))?;

        let username = unique_registration_number(pool, STUDENT_PREFIX).await?;
        // Social accounts authenticate via the provider; the local password
        // is random and never disclosed.
        let password_hash = hash_password(&credentials::random_password())
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let user = UserRepo::create(
            pool,
            &CreateUser {
                username,
                email: claims.email.clone(),
                password_hash,
                role_id: role.id,
                first_name: claims.first_name.clone(),
                last_name: claims.last_name.clone(),
            },
        )
        .await?;

        SocialAccountRepo::link(
            pool,
            user.id,
            &claims.provider,
            &claims.subject,
            Some(&claims.email),
        )
        .await?;

        NotificationPreferenceRepo::ensure_defaults(pool, user.id).await?;
        NotificationRepo::create(pool, user.id, &notification::welcome(), None, None).await?;
        ActivityLogRepo::record(
            pool,
            &format!(
                "The student account '{}' has been created via {} sign-in.",
                user.username, claims.provider
            ),
        )
        .await?;

        tracing::info!(
            user_id = user.id,
            provider = %claims.provider,
            "Created student account for social sign-in"
        );

        Ok(user)
    }
}

/// Generate a registration number not yet taken by any account.
pub async fn unique_registration_number(pool: &PgPool, prefix: &str) -> AppResult<String> {
    let year = chrono::Utc::now().year();
    for _ in 0..MAX_USERNAME_ATTEMPTS {
        let candidate = credentials::registration_number(prefix, year);
        if UserRepo::find_by_username(pool, &candidate).await?.is_none() {
            return Ok(candidate);
        }
    }
    Err(AppError::InternalError(
        "Could not generate an unused registration number".into(),
    ))
}

/// Response shape of Google's tokeninfo endpoint (fields we use).
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: String,
    #[serde(default)]
    given_name: String,
    #[serde(default)]
    family_name: String,
}

/// Verify a Google ID token and extract [`IdentityClaims`] from it.
///
/// The token's audience must match the configured OAuth client id and the
/// account email must be verified by Google.
pub async fn verify_google_id_token(
    id_token: &str,
    expected_client_id: &str,
) -> AppResult<IdentityClaims> {
    let response = reqwest::Client::new()
        .get(GOOGLE_TOKENINFO_URL)
        .query(&[("id_token", id_token)])
        .send()
        .await
        .map_err(|e| AppError::InternalError(format!("Token verification request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid Google ID token".into(),
        )));
    }

    let info: GoogleTokenInfo = response
        .json()
        .await
        .map_err(|e| AppError::InternalError(format!("Malformed tokeninfo response: {e}")))?;

    if info.aud != expected_client_id {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Google token was issued for another client".into(),
        )));
    }
    if info.email_verified != "true" {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Google account email is not verified".into(),
        )));
    }

    let email = info.email.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Google token carries no email claim".into(),
        ))
    })?;

    Ok(IdentityClaims {
        provider: PROVIDER_GOOGLE.to_string(),
        subject: info.sub,
        email,
        first_name: info.given_name,
        last_name: info.family_name,
    })
}
