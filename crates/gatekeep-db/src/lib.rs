//! Gatekeep DB - Database abstractions
//!
//! Repository traits for users and the refresh-token revocation registry,
//! with SQLx/PostgreSQL implementations and in-memory implementations for
//! single-process deployments and tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use gatekeep_db::{create_pool, run_migrations, Repositories};
//!
//! let pool = create_pool("postgres://localhost/gatekeep").await?;
//! run_migrations(&pool).await?;
//! let repos = Repositories::new(pool);
//!
//! let user = repos.users.find_by_email("ada@x.com").await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use memory::{InMemoryRefreshTokenRepository, InMemoryUserRepository};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repo::*;
