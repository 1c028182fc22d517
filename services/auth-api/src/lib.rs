//! Gatekeep Auth API
//!
//! User registration, credential login, logout and refresh token rotation
//! over HTTP.
//!
//! ## REST Endpoints
//!
//! - `POST /v1/auth/register` - Create a user
//! - `POST /v1/auth/login` - Exchange email and password for a token pair
//! - `POST /v1/auth/logout` - Revoke a refresh token
//! - `POST /v1/auth/refresh-tokens` - Rotate a refresh token
//! - `POST /v1/auth/change-password` - Replace the caller's password
//! - `GET /v1/auth/me` - Current user
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod purge;
pub mod routes;
pub mod state;
pub mod validation;

pub use routes::build_router;
