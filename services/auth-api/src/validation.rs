//! Request body validation
//!
//! Every check runs and all failures are reported together, one entry per
//! offending field.

use serde::Serialize;

use gatekeep_auth_core::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use gatekeep_types::{ChangePasswordRequest, LoginRequest, RefreshTokenRequest, RegisterRequest};

use crate::error::ApiError;

/// Longest accepted first or last name, in characters, after trimming
pub const MAX_NAME_LENGTH: usize = 20;

/// Longest accepted email address
pub const MAX_EMAIL_LENGTH: usize = 254;

/// A single field failure, reported under `error.details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = Errors::default();
    check_name(&mut errors, "firstName", &req.first_name);
    check_name(&mut errors, "lastName", &req.last_name);
    check_email(&mut errors, "email", &req.email);
    check_new_password(&mut errors, "password", &req.password);
    errors.finish()
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    let mut errors = Errors::default();
    check_email(&mut errors, "email", &req.email);
    if req.password.is_empty() {
        errors.push("password", "password is required");
    }
    errors.finish()
}

pub fn validate_refresh_token(req: &RefreshTokenRequest) -> Result<(), ApiError> {
    let mut errors = Errors::default();
    if req.refresh_token.trim().is_empty() {
        errors.push("refreshToken", "refreshToken is required");
    }
    errors.finish()
}

pub fn validate_change_password(req: &ChangePasswordRequest) -> Result<(), ApiError> {
    let mut errors = Errors::default();
    if req.current_password.is_empty() {
        errors.push("currentPassword", "currentPassword is required");
    }
    check_new_password(&mut errors, "newPassword", &req.new_password);
    errors.finish()
}

fn check_name(errors: &mut Errors, field: &'static str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{field} is required"));
    } else if value.chars().count() > MAX_NAME_LENGTH {
        errors.push(
            field,
            format!("{field} must be at most {MAX_NAME_LENGTH} characters"),
        );
    }
}

fn check_email(errors: &mut Errors, field: &'static str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, "email is required");
    } else if !is_valid_email(value) {
        errors.push(field, "email must be a valid email address");
    }
}

fn check_new_password(errors: &mut Errors, field: &'static str, value: &str) {
    let len = value.chars().count();
    if len == 0 {
        errors.push(field, format!("{field} is required"));
    } else if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        errors.push(
            field,
            format!(
                "{field} must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters"
            ),
        );
    }
}

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain with no empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}
