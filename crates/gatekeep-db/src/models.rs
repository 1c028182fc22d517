//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// User row from the database
///
/// Holds the password hash, so it is never serialized; convert into
/// [`gatekeep_types::User`] before returning it to a client.
#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("last_login", &self.last_login)
            .finish_non_exhaustive()
    }
}

/// Refresh token row from the revocation registry
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRow {
    /// Token ID (the `jti` claim)
    pub id: Uuid,
    pub user_id: Uuid,
    /// SHA-256 of the encoded token
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

// Conversion implementations from Row types to gatekeep-types domain types
impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> gatekeep_types::UserId {
        gatekeep_types::UserId(self.id)
    }
}

impl From<UserRow> for gatekeep_types::User {
    fn from(row: UserRow) -> Self {
        Self {
            id: gatekeep_types::UserId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl RefreshTokenRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> gatekeep_types::UserId {
        gatekeep_types::UserId(self.user_id)
    }

    /// Whether the token is still usable at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}
