//! Access and refresh token lifecycle
//!
//! Both token kinds are HS256 JWTs carrying a `typ` claim. Access tokens are
//! stateless. Refresh tokens are additionally recorded in a registry keyed by
//! the SHA-256 of the encoded token, and a refresh token is only honoured
//! while its registry entry exists, is unexpired and is not revoked.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;

use gatekeep_db::{CreateRefreshToken, RefreshTokenRepository};
use gatekeep_types::{Claims, TokenKind, TokenPair, UserId};

use crate::{hash_token, AuthConfig, AuthError, Clock, SigningKey};

/// Issues, verifies and revokes tokens
pub struct TokenService<R: ?Sized> {
    key: SigningKey,
    issuer: String,
    validation: Validation,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    registry: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: RefreshTokenRepository + ?Sized> TokenService<R> {
    /// Create a token service
    ///
    /// # Errors
    /// Returns [`AuthError::Configuration`] for a short secret or a TTL that
    /// does not fit a timestamp.
    pub fn new(
        config: &AuthConfig,
        registry: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let key = SigningKey::new(config.jwt_secret.as_bytes())
            .map_err(|e| AuthError::Configuration(e.to_string()))?;
        let access_ttl = to_chrono(config.access_token_ttl, "access token TTL")?;
        let refresh_ttl = to_chrono(config.refresh_token_ttl, "refresh token TTL")?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);
        // Expiry is checked against the injected clock, not the wall clock
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            key,
            issuer: config.issuer.clone(),
            validation,
            access_ttl,
            refresh_ttl,
            registry,
            clock,
        })
    }

    // ========================================================================
    // Issuance
    // ========================================================================

    /// Issue an access/refresh pair and record the refresh token
    pub async fn issue_tokens(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let now = self.clock.now();

        let (access_token, _) = self.encode(user_id, TokenKind::Access, now, self.access_ttl)?;
        let (refresh_token, refresh_claims) =
            self.encode(user_id, TokenKind::Refresh, now, self.refresh_ttl)?;

        let jti = Uuid::parse_str(&refresh_claims.jti)
            .map_err(|e| AuthError::Internal(format!("generated jti is not a UUID: {e}")))?;

        self.registry
            .create(CreateRefreshToken {
                id: jti,
                user_id: user_id.0,
                token_hash: hash_token(&refresh_token),
                expires_at: now + self.refresh_ttl,
            })
            .await
            .map_err(|e| {
                tracing::error!("Failed to record refresh token: {}", e);
                AuthError::Database(e.to_string())
            })?;

        tracing::debug!(user_id = %user_id, "Issued token pair");

        Ok(TokenPair::bearer(
            access_token,
            refresh_token,
            self.access_ttl.num_seconds().max(0) as u64,
            self.refresh_ttl.num_seconds().max(0) as u64,
        ))
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Verify an access token and return its subject
    pub fn verify_access(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.decode(token, TokenKind::Access)?;
        claims.user_id().ok_or(AuthError::InvalidToken)
    }

    /// Verify a refresh token against its signature, expiry and the registry
    pub async fn verify_refresh(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.decode(token, TokenKind::Refresh)?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        let record = self
            .registry
            .find_by_token_hash(&hash_token(token))
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up refresh token: {}", e);
                AuthError::Database(e.to_string())
            })?;

        match record {
            Some(row) if !row.is_active_at(self.clock.now()) => {
                if row.revoked {
                    tracing::debug!("Refresh token has been revoked");
                    Err(AuthError::TokenRevoked)
                } else {
                    tracing::debug!("Refresh token expired in registry");
                    Err(AuthError::TokenExpired)
                }
            }
            Some(row) if row.user_id() != user_id => {
                tracing::warn!("Refresh token subject does not match registry");
                Err(AuthError::InvalidToken)
            }
            Some(_) => Ok(user_id),
            None => {
                // Validly signed but never recorded, or already purged
                tracing::warn!("Refresh token not found in registry - rejecting");
                Err(AuthError::TokenRevoked)
            }
        }
    }

    // ========================================================================
    // Revocation
    // ========================================================================

    /// Revoke a refresh token. Never fails; unknown, malformed or already
    /// revoked tokens are ignored.
    pub async fn revoke_refresh(&self, token: &str) {
        if let Err(e) = self.decode_claims(token, TokenKind::Refresh) {
            tracing::debug!(error = %e, "Ignoring revocation of unverifiable token");
            return;
        }

        match self.registry.revoke_by_token_hash(&hash_token(token)).await {
            Ok(true) => tracing::debug!("Refresh token revoked"),
            Ok(false) => tracing::debug!("Refresh token already revoked or unknown"),
            Err(e) => tracing::error!("Failed to revoke refresh token: {}", e),
        }
    }

    /// Revoke every refresh token held by a user
    pub async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, AuthError> {
        self.registry
            .revoke_all_for_user(user_id.0)
            .await
            .map_err(|e| {
                tracing::error!("Failed to revoke refresh tokens: {}", e);
                AuthError::Database(e.to_string())
            })
    }

    /// Exchange a refresh token for a new pair. The presented token is
    /// revoked; only one concurrent exchange of the same token succeeds.
    pub async fn rotate_refresh(&self, token: &str) -> Result<TokenPair, AuthError> {
        let user_id = self.verify_refresh(token).await?;

        let revoked = self
            .registry
            .revoke_by_token_hash(&hash_token(token))
            .await
            .map_err(|e| {
                tracing::error!("Failed to revoke refresh token: {}", e);
                AuthError::Database(e.to_string())
            })?;
        if !revoked {
            tracing::warn!(user_id = %user_id, "Refresh token reused during rotation");
            return Err(AuthError::TokenRevoked);
        }

        self.issue_tokens(user_id).await
    }

    /// Drop expired and revoked registry entries
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        let removed = self
            .registry
            .delete_expired(self.clock.now())
            .await
            .map_err(|e| {
                tracing::error!("Failed to purge refresh tokens: {}", e);
                AuthError::Database(e.to_string())
            })?;
        if removed > 0 {
            tracing::info!(removed, "Purged refresh tokens");
        }
        Ok(removed)
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn encode(
        &self,
        user_id: UserId,
        kind: TokenKind,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Result<(String, Claims), AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            typ: kind,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding())
            .map_err(|e| {
                tracing::error!("Failed to sign {} token: {}", kind, e);
                AuthError::Internal("token signing failed".to_string())
            })?;

        Ok((token, claims))
    }

    /// Signature, issuer and kind checks, without expiry
    fn decode_claims(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, self.key.decoding(), &self.validation)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {}", e);
                AuthError::InvalidToken
            })?
            .claims;

        if claims.typ != expected {
            tracing::debug!("Expected {} token, got {}", expected, claims.typ);
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let claims = self.decode_claims(token, expected)?;
        if claims.is_expired_at(self.clock.now().timestamp()) {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

fn to_chrono(ttl: std::time::Duration, what: &str) -> Result<chrono::Duration, AuthError> {
    chrono::Duration::from_std(ttl)
        .map_err(|_| AuthError::Configuration(format!("{what} is out of range")))
}

impl<R: ?Sized> std::fmt::Debug for TokenService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
