//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing and password hashing
//! - `cache` - Redis connection for verification codes
//! - `database` - MySQL connection pool
//! - `environment` - Environment detection and logging
//! - `mail` - Outbound mail provider
//! - `server` - HTTP server binding
//! - `verification` - Verification code lifetimes per flow

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod mail;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthConfig, JwtConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::{MailConfig, MailProvider};
pub use server::ServerConfig;
pub use verification::VerificationConfig;

/// Rejected configuration. Raised at startup, never at request time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret must not be empty")]
    MissingJwtSecret,

    #[error("Access token lifetime ({access}s) must be shorter than refresh token lifetime ({refresh}s)")]
    TokenLifetimeOrder { access: i64, refresh: i64 },

    #[error("Token lifetimes must be positive")]
    NonPositiveTokenLifetime,

    #[error("Token lifetime {lifetime}s exceeds the maximum of {max}s")]
    TokenLifetimeTooLong { lifetime: i64, max: i64 },

    #[error("Verification code TTL for {flow} must be positive")]
    ZeroCodeTtl { flow: &'static str },

    #[error("Verification code TTL for {flow} ({ttl}s) exceeds the maximum of {max}s")]
    CodeTtlTooLong { flow: &'static str, ttl: u64, max: u64 },

    #[error("bcrypt cost {0} is outside the supported range 4..=31")]
    InvalidBcryptCost(u32),

    #[error("Mail provider '{0}' requires an endpoint")]
    MissingMailEndpoint(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Verification code configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Mail configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cache: CacheConfig::default(),
            verification: VerificationConfig::default(),
            mail: MailConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            cache: CacheConfig::from_env(),
            verification: VerificationConfig::from_env(),
            mail: MailConfig::from_env(),
            logging,
        }
    }

    /// Check the invariants the services rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()?;
        self.verification.validate()?;
        self.mail.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let mut config = AppConfig::default();
        config.auth.jwt.secret = String::new();
        assert_eq!(config.validate(), Err(ConfigError::MissingJwtSecret));
    }

    #[test]
    fn test_access_must_be_shorter_than_refresh() {
        let mut config = AppConfig::default();
        config.auth.jwt.access_token_expiry = 7200;
        config.auth.jwt.refresh_token_expiry = 7200;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TokenLifetimeOrder { .. })
        ));
    }

    #[test]
    fn test_config_roundtrips_through_serde() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.auth.jwt.access_token_expiry, 3600);
        assert_eq!(parsed.verification.registration_ttl, 180);
    }
}
