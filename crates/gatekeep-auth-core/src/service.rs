//! Auth service - ties together the user store, password hashing and tokens

use std::sync::Arc;

use gatekeep_db::{RefreshTokenRepository, UserRepository, UserRow};
use gatekeep_types::{TokenPair, User, UserId};

use crate::{
    AuthConfig, AuthError, Clock, NewUser, PasswordHasher, TokenService, UserStore,
};

/// Authentication service
///
/// Provides a single interface for:
/// - Registration and credential checks
/// - Logout and refresh token rotation
/// - Password changes
pub struct AuthService<U: ?Sized, R: ?Sized> {
    users: UserStore<U>,
    tokens: Arc<TokenService<R>>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
}

impl<U, R> AuthService<U, R>
where
    U: UserRepository + ?Sized,
    R: RefreshTokenRepository + ?Sized,
{
    /// Create a new auth service from already-built parts
    pub fn new(users: UserStore<U>, tokens: Arc<TokenService<R>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            hasher: users.hasher().clone(),
            users,
            tokens,
            clock,
        }
    }

    /// Build the hasher, user store and token service from configuration
    pub fn from_config(
        config: &AuthConfig,
        user_repo: Arc<U>,
        token_repo: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let tokens = Arc::new(TokenService::new(config, token_repo, Arc::clone(&clock))?);
        Ok(Self::new(UserStore::new(user_repo, hasher), tokens, clock))
    }

    pub fn users(&self) -> &UserStore<U> {
        &self.users
    }

    pub fn tokens(&self) -> &Arc<TokenService<R>> {
        &self.tokens
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new user
    pub async fn register(&self, new_user: NewUser) -> Result<User, AuthError> {
        self.users.create(new_user).await
    }

    // =========================================================================
    // Login / Logout
    // =========================================================================

    /// Check an email and password. Issues no tokens; the caller does that
    /// once this succeeds.
    ///
    /// An unknown email and a wrong password both yield
    /// [`AuthError::InvalidCredentials`], after the same amount of hashing
    /// work.
    pub async fn login_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let row = self.check_credentials(email, password).await?;

        let now = self.clock.now();
        self.users.touch_last_login(row.user_id(), now).await?;

        let mut user = User::from(row);
        user.last_login = Some(now);
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Look up the account and verify its password without recording a login
    async fn check_credentials(&self, email: &str, password: &str) -> Result<UserRow, AuthError> {
        let Some(row) = self.users.find_by_email(email).await? else {
            self.hasher.verify_dummy_offloaded(password.to_string()).await;
            tracing::debug!("Credentials rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let verified = self
            .hasher
            .verify_offloaded(password.to_string(), row.password_hash.clone())
            .await;
        if !verified {
            tracing::debug!(user_id = %row.id, "Credentials rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(row)
    }

    /// Revoke a refresh token. Never fails.
    pub async fn logout(&self, refresh_token: &str) {
        self.tokens.revoke_refresh(refresh_token).await;
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Exchange a refresh token for a new pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.tokens.rotate_refresh(refresh_token).await
    }

    /// Resolve the user behind an access token
    pub async fn current_user(&self, access_token: &str) -> Result<User, AuthError> {
        let user_id = self.tokens.verify_access(access_token)?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Replace a user's password and end every session they hold
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        self.check_credentials(&user.email, current_password)
            .await?;

        self.users.update_password(user_id, new_password).await?;
        let revoked = self.tokens.revoke_all_for_user(user_id).await?;
        tracing::info!(user_id = %user_id, revoked, "Password changed");
        Ok(())
    }
}

impl<U: ?Sized, R: ?Sized> std::fmt::Debug for AuthService<U, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("users", &self.users)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
