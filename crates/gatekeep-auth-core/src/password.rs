//! Password hashing
//!
//! bcrypt with a configurable work factor. Every hash embeds its own salt and
//! cost, so hashes produced at an older cost keep verifying after the cost
//! changes.

use std::sync::Arc;

use crate::AuthError;

/// Shortest accepted plaintext password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Longest accepted plaintext password, in characters
pub const MAX_PASSWORD_LENGTH: usize = 16;

/// Check a plaintext password against the length policy.
pub fn check_password_policy(password: &str) -> Result<(), AuthError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(AuthError::Validation(format!(
            "password must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// bcrypt password hasher.
///
/// Holds a hash of a random throwaway password so that a login for an
/// unknown email can spend the same work as a real verification.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    pub const DEFAULT_COST: u32 = 8;

    /// Create a hasher, rejecting costs bcrypt does not accept (4..=31).
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let throwaway = uuid::Uuid::new_v4().to_string();
        let dummy_hash = bcrypt::hash(throwaway, cost)
            .map_err(|e| AuthError::Configuration(format!("invalid bcrypt cost {cost}: {e}")))?;
        Ok(Self {
            cost,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AuthError::Internal("password hashing failed".to_string())
        })
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// A malformed hash verifies as `false`.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// Run a verification against the throwaway hash. Always `false`.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.dummy_hash);
        false
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_offloaded(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Hashing task failed");
                AuthError::Internal("hashing task failed".to_string())
            })?
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_offloaded(&self, plaintext: String, hash: String) -> bool {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash)).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(error = %e, "Verification task failed");
                false
            }
        }
    }

    /// [`verify_dummy`](Self::verify_dummy) on the blocking thread pool
    pub async fn verify_dummy_offloaded(&self, plaintext: String) -> bool {
        let hasher = self.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || hasher.verify_dummy(&plaintext)).await
        {
            tracing::error!(error = %e, "Verification task failed");
        }
        false
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}
