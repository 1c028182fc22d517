//! In-memory user repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::UserRow;
use crate::repo::{CreateUser, UserRepository};

/// In-memory user repository
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are stored
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        // The email entry stays locked until the row is in place, which makes
        // the uniqueness check and the insert a single step.
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!("User insert rejected: email already registered");
                Err(DbError::Conflict("email"))
            }
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let row = UserRow {
                    id: user.id,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    email: user.email,
                    password_hash: user.password_hash,
                    last_login: None,
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(row.id, row.clone());
                slot.insert(row.id);
                Ok(row)
            }
        }
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> DbResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.last_login = Some(at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> DbResult<()> {
        let mut user = self.users.get_mut(&id).ok_or(DbError::NotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}
