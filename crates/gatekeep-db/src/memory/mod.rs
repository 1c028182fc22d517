//! In-memory repository implementations
//!
//! Backed by `DashMap`, so concurrent readers and writers never block each
//! other across keys and a write is visible to the next read of the same key.
//! Used for single-process deployments without `DATABASE_URL` and in tests.

mod refresh_token;
mod user;

pub use refresh_token::InMemoryRefreshTokenRepository;
pub use user::InMemoryUserRepository;
