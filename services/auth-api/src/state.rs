//! Application state

use std::sync::Arc;

use gatekeep_auth_core::{AuthError, AuthService, Clock, TokenService};
use gatekeep_db::{
    InMemoryRefreshTokenRepository, InMemoryUserRepository, RefreshTokenRepository,
    Repositories, UserRepository,
};

use crate::config::Config;

/// Auth service over whichever storage backend was configured
pub type AuthServiceImpl = AuthService<dyn UserRepository, dyn RefreshTokenRepository>;

/// Token service over whichever storage backend was configured
pub type TokenServiceImpl = TokenService<dyn RefreshTokenRepository>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration, credential checks, logout and refresh
    pub auth: Arc<AuthServiceImpl>,
    /// Token issuance and verification (shared with `auth`)
    pub tokens: Arc<TokenServiceImpl>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state over the given repositories
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let auth = AuthService::from_config(&config.auth, users, refresh_tokens, clock)?;
        let tokens = Arc::clone(auth.tokens());
        Ok(Self {
            auth: Arc::new(auth),
            tokens,
            config: Arc::new(config),
        })
    }

    /// State backed by PostgreSQL
    pub fn with_postgres(
        config: Config,
        repos: Repositories,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        Self::new(
            config,
            Arc::new(repos.users),
            Arc::new(repos.refresh_tokens),
            clock,
        )
    }

    /// State backed by process memory
    pub fn in_memory(config: Config, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        Self::new(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryRefreshTokenRepository::new()),
            clock,
        )
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}
