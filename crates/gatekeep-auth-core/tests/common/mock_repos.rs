//! Repositories whose backing store is unreachable

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatekeep_db::{
    CreateRefreshToken, CreateUser, DbError, DbResult, RefreshTokenRepository, RefreshTokenRow,
    UserRepository, UserRow,
};
use uuid::Uuid;

fn unavailable() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolTimedOut)
}

/// Every call fails as if the pool were exhausted
#[derive(Debug, Default)]
pub struct UnavailableUserRepository;

#[async_trait]
impl UserRepository for UnavailableUserRepository {
    async fn find_by_id(&self, _id: Uuid) -> DbResult<Option<UserRow>> {
        Err(unavailable())
    }

    async fn find_by_email(&self, _email: &str) -> DbResult<Option<UserRow>> {
        Err(unavailable())
    }

    async fn create(&self, _user: CreateUser) -> DbResult<UserRow> {
        Err(unavailable())
    }

    async fn update_last_login(&self, _id: Uuid, _at: DateTime<Utc>) -> DbResult<()> {
        Err(unavailable())
    }

    async fn update_password_hash(&self, _id: Uuid, _password_hash: &str) -> DbResult<()> {
        Err(unavailable())
    }

    async fn ping(&self) -> DbResult<()> {
        Err(unavailable())
    }
}

/// Every call fails as if the pool were exhausted
#[derive(Debug, Default)]
pub struct UnavailableRefreshTokenRepository;

#[async_trait]
impl RefreshTokenRepository for UnavailableRefreshTokenRepository {
    async fn create(&self, _token: CreateRefreshToken) -> DbResult<RefreshTokenRow> {
        Err(unavailable())
    }

    async fn find_by_token_hash(&self, _token_hash: &str) -> DbResult<Option<RefreshTokenRow>> {
        Err(unavailable())
    }

    async fn revoke_by_token_hash(&self, _token_hash: &str) -> DbResult<bool> {
        Err(unavailable())
    }

    async fn revoke_all_for_user(&self, _user_id: Uuid) -> DbResult<u64> {
        Err(unavailable())
    }

    async fn delete_expired(&self, _now: DateTime<Utc>) -> DbResult<u64> {
        Err(unavailable())
    }
}
