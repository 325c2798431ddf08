//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, TokenError, VerificationError};

use thiserror::Error;

/// Coarse error classes exposed to callers. Every `DomainError` maps to
/// exactly one kind, which decides the HTTP status at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input
    Validation,
    /// Bad, missing or expired token, wrong password, wrong reset code
    Unauthorized,
    /// Authenticated but the role is not allowed
    Forbidden,
    /// No matching user or code
    NotFound,
    /// Duplicate email
    Conflict,
    /// Store or mail collaborator unavailable
    Transient,
    /// Misconfiguration or programming error
    Fatal,
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Service unavailable: {message}")]
    Transient { message: String },

    #[error("Internal error: {message}")]
    Fatal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Unauthorized => ErrorKind::Unauthorized,
            DomainError::Transient { .. } => ErrorKind::Transient,
            DomainError::Fatal { .. } => ErrorKind::Fatal,
            DomainError::Auth(e) => e.kind(),
            DomainError::Token(e) => e.kind(),
            DomainError::Verification(e) => e.kind(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        DomainError::Transient {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        DomainError::Fatal {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
