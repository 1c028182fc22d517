//! HTTP handlers

mod auth;
mod health;

pub use auth::{change_password, login, logout, me, refresh, register};
pub use health::{health, ready};
