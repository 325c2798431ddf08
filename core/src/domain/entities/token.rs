//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

/// Access token lifetime (1 hour)
pub const ACCESS_TOKEN_EXPIRY_SECONDS: i64 = 3600;

/// Refresh token lifetime (2 hours)
pub const REFRESH_TOKEN_EXPIRY_SECONDS: i64 = 7200;

/// Claims structure for JWT payload
///
/// Access and refresh tokens carry the same claim set and differ only in
/// `exp`. Downstream services read these five fields and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: Uuid,

    pub email: String,

    pub role: Role,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates claims issued at `now` that expire after `lifetime`
    ///
    /// Returns `None` when `now + lifetime` is not a representable instant.
    pub fn new(
        id: Uuid,
        email: impl Into<String>,
        role: Role,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Option<Self> {
        let exp = now.checked_add_signed(lifetime)?;
        Some(Self {
            id,
            email: email.into(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    pub fn lifetime_seconds(&self) -> i64 {
        self.exp - self.iat
    }
}

/// Access/refresh token pair returned after login, verification or refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,

    pub refresh_token: String,

    pub access_expires_at: DateTime<Utc>,

    pub refresh_expires_at: DateTime<Utc>,

    /// Always "Bearer"
    pub token_type: String,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_at: DateTime<Utc>,
        refresh_expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
            token_type: "Bearer".to_string(),
        }
    }
}
