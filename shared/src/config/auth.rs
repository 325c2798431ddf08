//! Authentication configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// Longest accepted token lifetime (30 days)
pub const MAX_TOKEN_LIFETIME_SECONDS: i64 = 30 * 24 * 60 * 60;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret for HS256 signing
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// Algorithm for JWT signing (default: HS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 3600,  // 1 hour
            refresh_token_expiry: 7200, // 2 hours
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err(ConfigError::NonPositiveTokenLifetime);
        }
        if self.refresh_token_expiry > MAX_TOKEN_LIFETIME_SECONDS {
            return Err(ConfigError::TokenLifetimeTooLong {
                lifetime: self.refresh_token_expiry,
                max: MAX_TOKEN_LIFETIME_SECONDS,
            });
        }
        if self.access_token_expiry >= self.refresh_token_expiry {
            return Err(ConfigError::TokenLifetimeOrder {
                access: self.access_token_expiry,
                refresh: self.refresh_token_expiry,
            });
        }
        Ok(())
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// bcrypt work factor used for every new hash
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());
        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);
        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "7200".to_string())
            .parse()
            .unwrap_or(7200);
        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_bcrypt_cost);

        Self {
            jwt: JwtConfig {
                secret,
                access_token_expiry,
                refresh_token_expiry,
                algorithm: default_algorithm(),
            },
            bcrypt_cost,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.bcrypt_cost));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_bcrypt_cost() -> u32 {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 3600);
        assert_eq!(config.refresh_token_expiry, 7200);
        assert_eq!(config.algorithm, "HS256");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_custom_secret() {
        let config = JwtConfig::new("my-secret");

        assert_eq!(config.access_token_expiry, 3600);
        assert!(!config.is_using_default_secret());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_lifetime_upper_bound() {
        let mut config = JwtConfig::new("my-secret");
        config.refresh_token_expiry = MAX_TOKEN_LIFETIME_SECONDS;
        assert!(config.validate().is_ok());

        config.refresh_token_expiry = 1 << 62;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TokenLifetimeTooLong {
                lifetime: 1 << 62,
                max: MAX_TOKEN_LIFETIME_SECONDS,
            })
        );
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let mut config = AuthConfig::default();
        config.bcrypt_cost = 3;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBcryptCost(3)));

        config.bcrypt_cost = 4;
        assert!(config.validate().is_ok());
    }
}
