//! Service wiring over in-memory repositories

use std::sync::Arc;
use std::time::Duration;

use gatekeep_auth_core::{AuthConfig, AuthService, ManualClock, NewUser};
use gatekeep_db::{InMemoryRefreshTokenRepository, InMemoryUserRepository};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// A fully wired service plus handles on its storage and clock
pub struct Harness {
    pub service: AuthService<InMemoryUserRepository, InMemoryRefreshTokenRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub registry: Arc<InMemoryRefreshTokenRepository>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(AuthConfig::new(TEST_SECRET).with_bcrypt_cost(4))
    }

    pub fn with_config(config: AuthConfig) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let registry = Arc::new(InMemoryRefreshTokenRepository::new());
        let clock = Arc::new(ManualClock::starting_now());
        let service =
            AuthService::from_config(&config, users.clone(), registry.clone(), clock.clone())
                .expect("valid test config");
        Self {
            service,
            users,
            registry,
            clock,
        }
    }

    pub fn with_access_ttl(ttl: Duration) -> Self {
        Self::with_config(
            AuthConfig::new(TEST_SECRET)
                .with_bcrypt_cost(4)
                .with_access_token_ttl(ttl),
        )
    }
}

pub fn ada() -> NewUser {
    NewUser {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@x.com".to_string(),
        password: "s3cretpw".to_string(),
    }
}
