//! Inputs and outputs of the authentication service

use chrono::NaiveDate;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{Gender, User};
use crate::errors::{DomainError, DomainResult};

/// Shortest accepted password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt ignores everything past 72 bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Registration form as submitted, password in plaintext
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub email: String,
    pub password: String,
}

/// Successful login: the account and a fresh token pair
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub tokens: TokenPair,
}

pub(crate) fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(DomainError::validation(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}
