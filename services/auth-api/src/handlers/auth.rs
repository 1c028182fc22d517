//! Authentication handlers (register, login, logout, refresh, me)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use gatekeep_auth_core::AuthError;
use gatekeep_types::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, RefreshTokenRequest,
    RegisterRequest, TokenPair, User,
};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthUser, BearerToken};
use crate::state::AppState;
use crate::validation;

/// Metric label for the result of an auth operation
fn outcome<T>(result: &Result<T, ApiError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(ApiError::Validation(_) | ApiError::BadRequest(_)) => "invalid_request",
        Err(ApiError::Auth(AuthError::DuplicateEmail)) => "duplicate_email",
        Err(ApiError::Auth(AuthError::InvalidCredentials)) => "invalid_credentials",
        Err(ApiError::Auth(AuthError::TokenExpired)) => "expired",
        Err(ApiError::Auth(AuthError::TokenRevoked)) => "revoked",
        Err(ApiError::Auth(AuthError::InvalidToken)) => "invalid_token",
        Err(_) => "error",
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let result = register_user(&state, payload).await;
    metrics::counter!("auth_registrations_total", "outcome" => outcome(&result)).increment(1);

    Ok((StatusCode::CREATED, Json(result?)))
}

async fn register_user(
    state: &AppState,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(req) = payload?;
    validation::validate_register(&req)?;
    Ok(state.auth.register(req.into()).await?)
}

/// POST /v1/auth/login
///
/// Checks credentials, then issues a fresh token pair
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let result = login_user(&state, payload).await;
    metrics::counter!("auth_logins_total", "outcome" => outcome(&result)).increment(1);

    Ok(Json(result?))
}

async fn login_user(
    state: &AppState,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(req) = payload?;
    validation::validate_login(&req)?;

    let user = state
        .auth
        .login_with_email_and_password(&req.email, &req.password)
        .await?;
    let tokens = state.tokens.issue_tokens(user.id).await?;
    Ok(LoginResponse { user, tokens })
}

/// POST /v1/auth/logout
///
/// Succeeds whether or not the token was valid
pub async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;
    validation::validate_refresh_token(&req)?;

    state.auth.logout(req.refresh_token.trim()).await;
    metrics::counter!("auth_logouts_total").increment(1);

    Ok(Json(MessageResponse::new("logout success")))
}

/// POST /v1/auth/refresh-tokens
///
/// Rotates a refresh token into a new pair
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let result = rotate_tokens(&state, payload).await;
    metrics::counter!("auth_token_refreshes_total", "outcome" => outcome(&result)).increment(1);

    Ok(Json(result?))
}

async fn rotate_tokens(
    state: &AppState,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<TokenPair> {
    let Json(req) = payload?;
    validation::validate_refresh_token(&req)?;
    Ok(state.auth.refresh(req.refresh_token.trim()).await?)
}

/// GET /v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<User>> {
    let user = state.auth.current_user(&token).await?;
    Ok(Json(user))
}

/// POST /v1/auth/change-password
///
/// Ends every session the user holds
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;
    validation::validate_change_password(&req)?;

    state
        .auth
        .change_password(user.user_id, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(MessageResponse::new("password changed")))
}
