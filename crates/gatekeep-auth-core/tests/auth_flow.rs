//! End-to-end flows through the auth service
//!
//! These tests verify:
//! - Register, login, issue, verify and logout for a single user
//! - Unknown email and wrong password are indistinguishable
//! - Logout is idempotent and a revoked refresh token stays revoked
//! - Token expiry follows the injected clock
//! - Storage failures surface as infrastructure errors, not auth outcomes

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ada, Harness, UnavailableRefreshTokenRepository, UnavailableUserRepository, TEST_SECRET};
use gatekeep_auth_core::{AuthConfig, AuthError, AuthService, Clock, ManualClock, TokenService};
use gatekeep_db::InMemoryRefreshTokenRepository;
use gatekeep_types::UserId;

// ============================================================================
// Registration and Login
// ============================================================================

#[tokio::test]
async fn test_register_login_logout_cycle() {
    let h = Harness::new();

    let registered = h.service.register(ada()).await.unwrap();
    assert_eq!(registered.email, "ada@x.com");
    assert!(registered.last_login.is_none());

    let user = h
        .service
        .login_with_email_and_password("ada@x.com", "s3cretpw")
        .await
        .unwrap();
    assert_eq!(user.id, registered.id);
    assert!(user.last_login.is_some());

    let pair = h.service.tokens().issue_tokens(user.id).await.unwrap();
    assert_eq!(h.service.tokens().verify_access(&pair.access_token).unwrap(), user.id);
    assert_eq!(
        h.service.tokens().verify_refresh(&pair.refresh_token).await.unwrap(),
        user.id
    );

    h.service.logout(&pair.refresh_token).await;
    assert!(matches!(
        h.service.tokens().verify_refresh(&pair.refresh_token).await,
        Err(AuthError::TokenRevoked)
    ));

    // Access tokens are stateless and outlive logout until they expire
    assert!(h.service.tokens().verify_access(&pair.access_token).is_ok());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let h = Harness::new();
    h.service.register(ada()).await.unwrap();

    assert!(h
        .service
        .login_with_email_and_password("  ADA@X.COM ", "s3cretpw")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_the_same() {
    let h = Harness::new();
    h.service.register(ada()).await.unwrap();

    let wrong_password = h
        .service
        .login_with_email_and_password("ada@x.com", "wrongpass")
        .await
        .unwrap_err();
    let unknown_email = h
        .service
        .login_with_email_and_password("nobody@x.com", "s3cretpw")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.error_code(), unknown_email.error_code());
}

#[tokio::test]
async fn test_failed_login_leaves_last_login_untouched() {
    let h = Harness::new();
    let user = h.service.register(ada()).await.unwrap();

    let _ = h
        .service
        .login_with_email_and_password("ada@x.com", "wrongpass")
        .await;

    let stored = h.service.users().find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.last_login.is_none());
}

#[tokio::test]
async fn test_password_change_is_not_a_login() {
    let h = Harness::new();
    let user = h.service.register(ada()).await.unwrap();

    h.clock.advance(chrono::Duration::hours(1));
    h.service
        .change_password(user.id, "s3cretpw", "n3wpassword")
        .await
        .unwrap();

    let stored = h.service.users().find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.last_login.is_none());

    let logged_in = h
        .service
        .login_with_email_and_password("ada@x.com", "n3wpassword")
        .await
        .unwrap();
    assert_eq!(logged_in.last_login, Some(h.clock.now()));
}

#[tokio::test]
async fn test_duplicate_registration() {
    let h = Harness::new();
    h.service.register(ada()).await.unwrap();

    let mut again = ada();
    again.email = "Ada@X.com".to_string();
    again.password = "otherpass".to_string();

    assert!(matches!(
        h.service.register(again).await,
        Err(AuthError::DuplicateEmail)
    ));
    assert_eq!(h.users.len(), 1);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_is_idempotent() {
    let h = Harness::new();
    let user = h.service.register(ada()).await.unwrap();
    let pair = h.service.tokens().issue_tokens(user.id).await.unwrap();

    h.service.logout(&pair.refresh_token).await;
    h.service.logout(&pair.refresh_token).await;

    assert!(matches!(
        h.service.refresh(&pair.refresh_token).await,
        Err(AuthError::TokenRevoked)
    ));
}

#[tokio::test]
async fn test_logout_ignores_garbage_and_access_tokens() {
    let h = Harness::new();
    let user = h.service.register(ada()).await.unwrap();
    let pair = h.service.tokens().issue_tokens(user.id).await.unwrap();

    h.service.logout("").await;
    h.service.logout("not.a.jwt").await;
    h.service.logout(&pair.access_token).await;

    // The refresh token is untouched
    assert!(h.service.refresh(&pair.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_logout_only_revokes_the_presented_session() {
    let h = Harness::new();
    let user = h.service.register(ada()).await.unwrap();
    let laptop = h.service.tokens().issue_tokens(user.id).await.unwrap();
    let phone = h.service.tokens().issue_tokens(user.id).await.unwrap();

    h.service.logout(&laptop.refresh_token).await;

    assert!(h
        .service
        .tokens()
        .verify_refresh(&phone.refresh_token)
        .await
        .is_ok());
}

// ============================================================================
// Expiry
// ============================================================================

#[tokio::test]
async fn test_access_token_expires_with_clock() {
    let h = Harness::with_access_ttl(Duration::from_secs(60));
    let user = h.service.register(ada()).await.unwrap();
    let pair = h.service.tokens().issue_tokens(user.id).await.unwrap();
    assert_eq!(pair.expires_in, 60);

    h.clock.advance(chrono::Duration::seconds(61));
    assert!(matches!(
        h.service.tokens().verify_access(&pair.access_token),
        Err(AuthError::TokenExpired)
    ));
    assert!(matches!(
        h.service.current_user(&pair.access_token).await,
        Err(AuthError::TokenExpired)
    ));
}

#[tokio::test]
async fn test_refresh_token_expires_with_clock() {
    let h = Harness::new();
    let user = h.service.register(ada()).await.unwrap();
    let pair = h.service.tokens().issue_tokens(user.id).await.unwrap();

    h.clock.advance(chrono::Duration::days(30));
    assert!(matches!(
        h.service.refresh(&pair.refresh_token).await,
        Err(AuthError::TokenExpired)
    ));

    assert_eq!(h.service.tokens().purge_expired().await.unwrap(), 1);
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn test_refresh_rotates_pair() {
    let h = Harness::new();
    let user = h.service.register(ada()).await.unwrap();
    let first = h.service.tokens().issue_tokens(user.id).await.unwrap();

    let second = h.service.refresh(&first.refresh_token).await.unwrap();
    assert_eq!(
        h.service.tokens().verify_access(&second.access_token).unwrap(),
        user.id
    );
    assert!(matches!(
        h.service.refresh(&first.refresh_token).await,
        Err(AuthError::TokenRevoked)
    ));
}

// ============================================================================
// Signing key separation
// ============================================================================

#[tokio::test]
async fn test_token_from_other_deployment_rejected() {
    let h = Harness::new();
    let other = TokenService::new(
        &AuthConfig::new("a-different-deployment-secret-32-bytes!"),
        Arc::new(InMemoryRefreshTokenRepository::new()),
        Arc::new(ManualClock::starting_now()),
    )
    .unwrap();

    let foreign = other.issue_tokens(UserId::new()).await.unwrap();
    assert!(matches!(
        h.service.tokens().verify_access(&foreign.access_token),
        Err(AuthError::InvalidToken)
    ));
    assert!(matches!(
        h.service.refresh(&foreign.refresh_token).await,
        Err(AuthError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_token_from_other_issuer_rejected() {
    let h = Harness::new();
    let other = TokenService::new(
        &AuthConfig::new(TEST_SECRET).with_issuer("someone-else"),
        Arc::new(InMemoryRefreshTokenRepository::new()),
        Arc::new(ManualClock::starting_now()),
    )
    .unwrap();

    let foreign = other.issue_tokens(UserId::new()).await.unwrap();
    assert!(matches!(
        h.service.tokens().verify_access(&foreign.access_token),
        Err(AuthError::InvalidToken)
    ));
}

// ============================================================================
// Infrastructure failures
// ============================================================================

#[tokio::test]
async fn test_unreachable_user_store_is_not_invalid_credentials() {
    let service = AuthService::from_config(
        &AuthConfig::new(TEST_SECRET).with_bcrypt_cost(4),
        Arc::new(UnavailableUserRepository),
        Arc::new(InMemoryRefreshTokenRepository::new()),
        Arc::new(ManualClock::starting_now()),
    )
    .unwrap();

    let err = service
        .login_with_email_and_password("ada@x.com", "s3cretpw")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Database(_)));
    assert!(err.is_infrastructure());

    assert!(service.users().ping().await.is_err());
}

#[tokio::test]
async fn test_unreachable_registry_fails_issue_but_not_logout() {
    let tokens = TokenService::new(
        &AuthConfig::new(TEST_SECRET),
        Arc::new(UnavailableRefreshTokenRepository),
        Arc::new(ManualClock::starting_now()),
    )
    .unwrap();

    assert!(matches!(
        tokens.issue_tokens(UserId::new()).await,
        Err(AuthError::Database(_))
    ));

    // Revocation swallows storage errors
    let h = Harness::new();
    let pair = h.service.tokens().issue_tokens(UserId::new()).await.unwrap();
    tokens.revoke_refresh(&pair.refresh_token).await;
}
