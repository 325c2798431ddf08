//! Authentication service module
//!
//! This module orchestrates the credential lifecycle:
//! - Registration with email confirmation
//! - Login, credential checks and token refresh
//! - Password change and code-based password reset
//! - Code-confirmed email change
//! - Profile and admin operations on the credential store

mod service;
mod types;

#[cfg(test)]
mod tests;

pub use service::AuthService;
pub use types::{LoginResult, RegistrationRequest, MAX_PASSWORD_BYTES, MIN_PASSWORD_LENGTH};
