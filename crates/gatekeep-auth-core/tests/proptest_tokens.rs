//! Property-based tests for token verification
//!
//! These tests verify:
//! - Issued tokens verify to the subject they were issued for
//! - Malformed tokens never cause panics and are always rejected
//! - Tampering with any part of a token is always detected
//! - Short signing secrets are always rejected

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use gatekeep_auth_core::{
    AuthConfig, AuthError, ManualClock, SigningKey, SigningKeyError, TokenService,
};
use gatekeep_db::InMemoryRefreshTokenRepository;
use gatekeep_types::UserId;
use proptest::prelude::*;

const SECRET: &str = "proptest-secret-key-at-least-32-bytes-long";

fn service() -> TokenService<InMemoryRefreshTokenRepository> {
    TokenService::new(
        &AuthConfig::new(SECRET),
        Arc::new(InMemoryRefreshTokenRepository::new()),
        Arc::new(ManualClock::starting_now()),
    )
    .unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_user_id() -> impl Strategy<Value = UserId> {
    any::<[u8; 16]>().prop_map(|bytes| UserId(uuid::Uuid::from_bytes(bytes)))
}

/// Generate malformed token strings
fn arb_malformed_token() -> impl Strategy<Value = String> {
    prop_oneof![
        // No dots
        "[a-zA-Z0-9_-]{10,50}",
        // Wrong number of segments
        "[a-zA-Z0-9_-]{10,20}\\.[a-zA-Z0-9_-]{5,10}",
        "[a-zA-Z0-9_-]{5,10}(\\.[a-zA-Z0-9_-]{5,10}){3,5}",
        // Empty parts
        Just("..".to_string()),
        Just(".".to_string()),
        Just("".to_string()),
        // Invalid base64 characters
        "[!@#$%^&*()]{10,30}\\.[a-zA-Z0-9_-]{20,40}\\.[a-zA-Z0-9_-]{20,40}",
        // Valid base64 segments that are not JSON
        (any::<[u8; 24]>(), any::<[u8; 24]>()).prop_map(|(h, p)| {
            format!(
                "{}.{}.fake_sig",
                URL_SAFE_NO_PAD.encode(h),
                URL_SAFE_NO_PAD.encode(p)
            )
        }),
    ]
}

/// Generate secrets shorter than the minimum
fn arb_short_secret() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..SigningKey::MIN_KEY_LENGTH)
}

// ============================================================================
// Issuance Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: an issued pair verifies to its subject
    #[test]
    fn issued_tokens_verify_to_subject(user_id in arb_user_id()) {
        let rt = runtime();
        let service = service();

        let pair = rt.block_on(service.issue_tokens(user_id)).unwrap();
        prop_assert_eq!(service.verify_access(&pair.access_token).unwrap(), user_id);
        prop_assert_eq!(
            rt.block_on(service.verify_refresh(&pair.refresh_token)).unwrap(),
            user_id
        );
    }

    /// Property: flipping any character of the signature invalidates the token
    #[test]
    fn tampered_signature_rejected(user_id in arb_user_id(), index in any::<prop::sample::Index>()) {
        let rt = runtime();
        let service = service();
        let pair = rt.block_on(service.issue_tokens(user_id)).unwrap();

        let token = pair.access_token;
        let sig_start = token.rfind('.').unwrap() + 1;
        let sig_len = token.len() - sig_start;
        let pos = sig_start + index.index(sig_len);

        let mut bytes = token.into_bytes();
        bytes[pos] = if bytes[pos] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        prop_assert!(matches!(
            service.verify_access(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    /// Property: swapping in another token's payload invalidates the token
    #[test]
    fn swapped_payload_rejected(a in arb_user_id(), b in arb_user_id()) {
        prop_assume!(a != b);
        let rt = runtime();
        let service = service();
        let first = rt.block_on(service.issue_tokens(a)).unwrap().access_token;
        let second = rt.block_on(service.issue_tokens(b)).unwrap().access_token;

        let first_parts: Vec<&str> = first.split('.').collect();
        let second_parts: Vec<&str> = second.split('.').collect();
        let forged = format!("{}.{}.{}", first_parts[0], second_parts[1], first_parts[2]);

        prop_assert!(service.verify_access(&forged).is_err());
    }
}

// ============================================================================
// Rejection Properties
// ============================================================================

proptest! {
    /// Property: malformed tokens are rejected without panicking
    #[test]
    fn malformed_tokens_rejected(token in arb_malformed_token()) {
        let service = service();
        prop_assert!(matches!(
            service.verify_access(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    /// Property: revoking garbage never panics
    #[test]
    fn revoking_garbage_is_harmless(token in ".{0,200}") {
        let rt = runtime();
        let service = service();
        rt.block_on(service.revoke_refresh(&token));
    }

    /// Property: short secrets are always rejected
    #[test]
    fn short_secrets_rejected(secret in arb_short_secret()) {
        let len = secret.len();
        let result = SigningKey::new(secret);
        prop_assert!(
            matches!(result, Err(SigningKeyError::KeyTooShort { actual, .. }) if actual == len),
            "expected KeyTooShort with actual == {}, got {:?}", len, result
        );
    }
}
