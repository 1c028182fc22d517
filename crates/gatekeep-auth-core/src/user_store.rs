//! User persistence with credential hashing

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use gatekeep_db::{CreateUser, DbError, UserRepository, UserRow};
use gatekeep_types::{normalize_email, RegisterRequest, User, UserId};

use crate::{check_password_policy, AuthError, PasswordHasher};

/// Input for creating a user. The password is plaintext until hashed by
/// [`UserStore::create`].
#[derive(Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Stores users. Plaintext passwords never reach the repository.
pub struct UserStore<U: ?Sized> {
    repo: Arc<U>,
    hasher: PasswordHasher,
}

impl<U: UserRepository + ?Sized> UserStore<U> {
    pub fn new(repo: Arc<U>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Check that the backing store is reachable
    pub async fn ping(&self) -> Result<(), AuthError> {
        Ok(self.repo.ping().await?)
    }

    /// Create a user, hashing the password and normalizing the email.
    ///
    /// # Errors
    /// [`AuthError::DuplicateEmail`] when the normalized email is taken.
    pub async fn create(&self, new_user: NewUser) -> Result<User, AuthError> {
        check_password_policy(&new_user.password)?;

        let email = normalize_email(&new_user.email);
        let password_hash = self.hasher.hash_offloaded(new_user.password).await?;

        let row = self
            .repo
            .create(CreateUser {
                id: Uuid::new_v4(),
                first_name: new_user.first_name.trim().to_string(),
                last_name: new_user.last_name.trim().to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DbError::Conflict(_) => AuthError::DuplicateEmail,
                other => other.into(),
            })?;

        tracing::info!(user_id = %row.id, "User created");
        Ok(row.into())
    }

    /// Look up a user row, password hash included
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AuthError> {
        Ok(self.repo.find_by_email(&normalize_email(email)).await?)
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.repo.find_by_id(id.0).await?.map(User::from))
    }

    pub async fn touch_last_login(&self, id: UserId, at: DateTime<Utc>) -> Result<(), AuthError> {
        Ok(self.repo.update_last_login(id.0, at).await?)
    }

    /// Replace a user's password
    pub async fn update_password(&self, id: UserId, new_password: &str) -> Result<(), AuthError> {
        check_password_policy(new_password)?;

        let password_hash = self.hasher.hash_offloaded(new_password.to_string()).await?;
        self.repo
            .update_password_hash(id.0, &password_hash)
            .await
            .map_err(|e| match e {
                DbError::NotFound => AuthError::UserNotFound,
                other => other.into(),
            })
    }
}

impl<U: ?Sized> std::fmt::Debug for UserStore<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}
