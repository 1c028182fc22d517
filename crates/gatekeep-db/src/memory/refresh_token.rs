//! In-memory refresh token registry

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::RefreshTokenRow;
use crate::repo::{CreateRefreshToken, RefreshTokenRepository};

/// In-memory refresh token repository, keyed by token hash
#[derive(Default, Clone)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Arc<DashMap<String, RefreshTokenRow>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked tokens, revoked ones included
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no tokens are tracked
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: CreateRefreshToken) -> DbResult<RefreshTokenRow> {
        let row = RefreshTokenRow {
            id: token.id,
            user_id: token.user_id,
            token_hash: token.token_hash.clone(),
            expires_at: token.expires_at,
            revoked: false,
            created_at: Utc::now(),
        };
        self.tokens.insert(token.token_hash, row.clone());
        Ok(row)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> DbResult<Option<RefreshTokenRow>> {
        Ok(self.tokens.get(token_hash).map(|r| r.value().clone()))
    }

    async fn revoke_by_token_hash(&self, token_hash: &str) -> DbResult<bool> {
        Ok(match self.tokens.get_mut(token_hash) {
            Some(mut t) if !t.revoked => {
                t.revoked = true;
                true
            }
            _ => false,
        })
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> DbResult<u64> {
        let mut count = 0;
        for mut t in self.tokens.iter_mut() {
            if t.user_id == user_id && !t.revoked {
                t.revoked = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let stale: Vec<String> = self
            .tokens
            .iter()
            .filter(|r| r.revoked || r.expires_at <= now)
            .map(|r| r.key().clone())
            .collect();

        let mut count = 0;
        for hash in stale {
            if self
                .tokens
                .remove_if(&hash, |_, t| t.revoked || t.expires_at <= now)
                .is_some()
            {
                count += 1;
            }
        }
        Ok(count)
    }
}
