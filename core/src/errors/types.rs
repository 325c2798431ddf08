//! Error types for authentication, token handling and verification codes
//!
//! Messages on the caller-facing variants are deliberately generic: they
//! never reveal whether an email is registered.

use thiserror::Error;

use super::ErrorKind;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email, deleted account or wrong password. One message for all.
    #[error("Email or password is incorrect")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectCurrentPassword,

    #[error("Verification code or email is incorrect")]
    InvalidResetCode,

    #[error("Email is already registered")]
    EmailAlreadyRegistered,

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::IncorrectCurrentPassword
            | AuthError::InvalidResetCode => ErrorKind::Unauthorized,
            AuthError::EmailAlreadyRegistered => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InsufficientPermissions => ErrorKind::Forbidden,
            AuthError::HashingFailed(_) => ErrorKind::Fatal,
        }
    }
}

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing authorization token")]
    MissingToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Signing secret is not configured")]
    MissingSecret,
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::TokenExpired | TokenError::InvalidToken | TokenError::MissingToken => {
                ErrorKind::Unauthorized
            }
            TokenError::GenerationFailed(_)
            | TokenError::UnsupportedAlgorithm(_)
            | TokenError::MissingSecret => ErrorKind::Fatal,
        }
    }
}

/// Verification code errors
#[derive(Error, Debug)]
pub enum VerificationError {
    /// Absent, expired, already consumed or lost a concurrent race
    #[error("Verification code is invalid or expired")]
    CodeNotFound,

    /// Code exists but was issued for a different identity
    #[error("Verification code or email is incorrect")]
    Mismatch,

    #[error("Could not reserve a unique verification code")]
    CodeSpaceExhausted,

    #[error("Verification store unavailable: {0}")]
    Store(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Stored verification payload is unreadable: {0}")]
    CorruptPayload(String),
}

impl VerificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerificationError::CodeNotFound => ErrorKind::NotFound,
            VerificationError::Mismatch => ErrorKind::Unauthorized,
            VerificationError::CodeSpaceExhausted
            | VerificationError::Store(_)
            | VerificationError::Mail(_) => ErrorKind::Transient,
            VerificationError::CorruptPayload(_) => ErrorKind::Fatal,
        }
    }
}
