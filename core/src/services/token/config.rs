//! Configuration for the token service

use jsonwebtoken::Algorithm;

use dl_shared::config::JwtConfig;

use crate::domain::entities::token::{ACCESS_TOKEN_EXPIRY_SECONDS, REFRESH_TOKEN_EXPIRY_SECONDS};
use crate::errors::TokenError;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub access_token_expiry_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_seconds: i64,
}

impl TokenServiceConfig {
    /// Create a configuration with the default lifetimes
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_token_expiry_seconds: ACCESS_TOKEN_EXPIRY_SECONDS,
            refresh_token_expiry_seconds: REFRESH_TOKEN_EXPIRY_SECONDS,
        }
    }

    /// Build from the shared JWT configuration
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, TokenError> {
        let algorithm = match config.algorithm.to_uppercase().as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => return Err(TokenError::UnsupportedAlgorithm(other.to_string())),
        };

        Ok(Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            access_token_expiry_seconds: config.access_token_expiry,
            refresh_token_expiry_seconds: config.refresh_token_expiry,
        })
    }
}
