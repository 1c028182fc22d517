//! Configuration for the Auth API service.

use gatekeep_auth_core::AuthConfig;
use std::str::FromStr;
use std::time::Duration;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL. Without one the service keeps users and refresh tokens
    /// in process memory.
    pub database_url: Option<String>,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Request timeout
    pub request_timeout: Duration,

    /// Interval between refresh token registry purges
    pub purge_interval: Duration,

    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        // Server port
        let http_port = parse_or(&lookup, "HTTP_PORT", 8080)?;

        // Token signing secret (minimum 32 bytes)
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| AuthConfig::DEFAULT_ISSUER.to_string());

        // Token lifetimes
        let access_minutes: u64 = parse_or(&lookup, "ACCESS_TOKEN_TTL_MINUTES", 15)?;
        let refresh_days: u64 = parse_or(&lookup, "REFRESH_TOKEN_TTL_DAYS", 30)?;
        if access_minutes == 0 {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_MINUTES"));
        }
        if refresh_days == 0 {
            return Err(ConfigError::Invalid("REFRESH_TOKEN_TTL_DAYS"));
        }

        // Hashing work factor
        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", 8)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        // Request timeout (default 30 seconds)
        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        // Registry purge (default hourly)
        let purge_interval_secs: u64 = parse_or(&lookup, "PURGE_INTERVAL_SECS", 3600)?;
        if purge_interval_secs == 0 {
            return Err(ConfigError::Invalid("PURGE_INTERVAL_SECS"));
        }

        // Metrics
        let metrics_enabled = lookup("METRICS_ENABLED")
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        // Build auth config
        let auth = AuthConfig::try_new(jwt_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_issuer(issuer)
            .with_access_token_ttl(Duration::from_secs(access_minutes * 60))
            .with_refresh_token_ttl(Duration::from_secs(refresh_days * 24 * 60 * 60))
            .with_bcrypt_cost(bcrypt_cost);

        Ok(Self {
            http_port,
            database_url,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
            purge_interval: Duration::from_secs(purge_interval_secs),
            metrics_enabled,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
