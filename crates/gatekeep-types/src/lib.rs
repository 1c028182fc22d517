//! Gatekeep Types - Shared domain types
//!
//! This crate contains domain types used across Gatekeep services:
//! - User identity and the public user profile
//! - Token pairs and token claims
//! - Request/response bodies of the auth API

pub mod auth;
pub mod token;
pub mod user;

pub use auth::*;
pub use token::*;
pub use user::*;
