//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by (already normalized) email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user
    ///
    /// Fails with [`DbError::Conflict`](crate::DbError::Conflict) when the
    /// email is already taken.
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Record a successful login
    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> DbResult<()>;

    /// Replace the stored password hash
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DbResult<()>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

/// Create user input
#[derive(Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Refresh token registry trait
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Record a newly issued refresh token
    async fn create(&self, token: CreateRefreshToken) -> DbResult<RefreshTokenRow>;

    /// Find a token by hash, whatever its state
    async fn find_by_token_hash(&self, token_hash: &str) -> DbResult<Option<RefreshTokenRow>>;

    /// Mark a token revoked. Returns whether an active token was revoked.
    async fn revoke_by_token_hash(&self, token_hash: &str) -> DbResult<bool>;

    /// Revoke all tokens for a user
    async fn revoke_all_for_user(&self, user_id: Uuid) -> DbResult<u64>;

    /// Delete tokens that are expired at `now` or revoked
    async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64>;
}

/// Create refresh token input
#[derive(Debug, Clone)]
pub struct CreateRefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
