//! Main token service implementation

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenPair};
use crate::domain::entities::user::Role;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Service issuing and verifying HMAC-signed JWTs
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration carrying the signing secret
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or a fatal error when the secret is empty
    pub fn new(config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.is_empty() {
            return Err(TokenError::MissingSecret.into());
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Generates a new token pair (access + refresh tokens) for a user
    ///
    /// Both tokens carry the same claims and differ only in `exp`.
    pub fn issue_pair(&self, user_id: Uuid, email: &str, role: Role) -> Result<TokenPair, DomainError> {
        let now = Utc::now();

        let access_claims = claims_expiring_in(user_id, email, role, now, self.config.access_token_expiry_seconds)?;
        let refresh_claims = claims_expiring_in(user_id, email, role, now, self.config.refresh_token_expiry_seconds)?;

        let access_token = self.encode_jwt(&access_claims)?;
        let refresh_token = self.encode_jwt(&refresh_claims)?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            timestamp_to_utc(access_claims.exp)?,
            timestamp_to_utc(refresh_claims.exp)?,
        ))
    }

    /// Verifies a token signature and expiry and returns the claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(DomainError)` - `TokenExpired` or `InvalidToken`
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                _ => DomainError::Token(TokenError::InvalidToken),
            })
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.config.access_token_expiry_seconds
    }

    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.config.refresh_token_expiry_seconds
    }

    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, event = "token_signing_failed", "Failed to sign token");
            DomainError::Token(TokenError::GenerationFailed(e.to_string()))
        })
    }
}

fn claims_expiring_in(
    user_id: Uuid,
    email: &str,
    role: Role,
    now: DateTime<Utc>,
    lifetime_seconds: i64,
) -> Result<Claims, DomainError> {
    Duration::try_seconds(lifetime_seconds)
        .and_then(|lifetime| Claims::new(user_id, email, role, now, lifetime))
        .ok_or_else(|| {
            DomainError::fatal(format!("Token lifetime {}s is out of range", lifetime_seconds))
        })
}

fn timestamp_to_utc(ts: i64) -> Result<DateTime<Utc>, DomainError> {
    Utc.timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| TokenError::GenerationFailed(format!("timestamp {} out of range", ts)).into())
}
