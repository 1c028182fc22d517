//! Common test utilities for gatekeep-auth-core integration tests

pub mod fixtures;
pub mod mock_repos;

#[allow(unused_imports)]
pub use fixtures::{ada, Harness, TEST_SECRET};
#[allow(unused_imports)]
pub use mock_repos::{UnavailableRefreshTokenRepository, UnavailableUserRepository};
