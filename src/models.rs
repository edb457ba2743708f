use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Avatar served for users who never uploaded one.
pub const DEFAULT_AVATAR_URL: &str = "https://i.sstatic.net/frlIf.png";

// --- Session Schemas (Written by the auth framework, read here) ---

/// SessionUser
///
/// The user record owning a session, as stored in the `users` table.
/// This service never creates users; it only reads them and edits the profile fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    // NULL until the user sets an avatar.
    pub image: Option<String>,
    // 'user' or 'admin'. Assigned by the auth framework, never by user input.
    pub role: String,
}

impl SessionUser {
    /// The stored avatar, or the default one.
    pub fn avatar(&self) -> &str {
        self.image.as_deref().unwrap_or(DEFAULT_AVATAR_URL)
    }
}

/// Session
///
/// A live session row joined with its owner. The route guard only cares whether
/// one exists; page handlers use the embedded user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    #[ts(type = "string")]
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// SessionRow
///
/// Flat projection of the `sessions JOIN users` query. Converted into `Session` right away.
#[derive(Debug, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    pub role: String,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
            user: SessionUser {
                id: row.user_id,
                name: row.name,
                email: row.email,
                email_verified: row.email_verified,
                image: row.image,
                role: row.role,
            },
        }
    }
}

// --- Request Payloads ---

/// UpdateProfileRequest
///
/// Input payload for `PUT /settings/profile`. Absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

impl UpdateProfileRequest {
    pub const NAME_MIN: usize = 2;
    pub const NAME_MAX: usize = 50;

    /// validate
    ///
    /// A provided name must be 2 to 50 characters long. An empty string counts
    /// as provided and is rejected.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            let len = name.chars().count();
            if !(Self::NAME_MIN..=Self::NAME_MAX).contains(&len) {
                return Err(AppError::Validation(
                    "Username must be between 2 and 50 characters long.".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// --- Response Payloads ---

/// HomeResponse
///
/// Landing page data. Rendered for everyone.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct HomeResponse {
    pub signed_in: bool,
    pub name: Option<String>,
}

/// SigninPage
///
/// Describes the sign-in form: which providers are offered.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SigninPage {
    pub providers: Vec<String>,
    pub submit_to: String,
}

/// SignupPage
///
/// Describes the sign-up form. New accounts must verify their email before signing in.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignupPage {
    pub fields: Vec<String>,
    pub submit_to: String,
    pub requires_email_verification: bool,
}

/// ProfileResponse
///
/// The signed-in user's public profile (`GET /profile`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub role: String,
}

impl From<&SessionUser> for ProfileResponse {
    fn from(user: &SessionUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.avatar().to_string(),
            role: user.role.clone(),
        }
    }
}

/// ProfileSettings
///
/// Editable profile fields (`GET`/`PUT /settings/profile`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ProfileSettings {
    pub name: String,
    pub email: String,
    pub image: String,
}

impl From<&SessionUser> for ProfileSettings {
    fn from(user: &SessionUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.avatar().to_string(),
        }
    }
}

/// AccountSettings
///
/// Read-only account facts (`GET /settings/account`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AccountSettings {
    pub email: String,
    pub email_verified: bool,
    pub role: String,
}

impl From<&SessionUser> for AccountSettings {
    fn from(user: &SessionUser) -> Self {
        Self {
            email: user.email.clone(),
            email_verified: user.email_verified,
            role: user.role.clone(),
        }
    }
}
