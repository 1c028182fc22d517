//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Unique constraint violated
    #[error("conflict on {0}")]
    Conflict(&'static str),

    /// Record not found
    #[error("record not found")]
    NotFound,
}

/// Result alias for repository operations
pub type DbResult<T> = Result<T, DbError>;
