//! Gatekeep Auth Core - Credential and session lifecycle
//!
//! Password hashing, access/refresh token issuance and verification with a
//! revocation registry, the user store, and the login/logout orchestration
//! built on top of them.

pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod password;
pub mod service;
pub mod token;
pub mod user_store;

pub use clock::*;
pub use config::*;
pub use crypto::*;
pub use error::*;
pub use password::*;
pub use service::*;
pub use token::*;
pub use user_store::*;
