//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the Auth core depends on.
//!
//! ## Architecture
//!
//! - **Database**: MySQL credential store using SQLx
//! - **Cache**: Redis-backed verification code store
//! - **Mail**: Outbound mail senders (logging mock and HTTP provider)
//! - **Memory**: In-process implementations for tests and local development
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis code store support (default)

use dl_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and code store
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Mail module - verification code delivery
pub mod mail;

/// In-memory repository and code store
pub mod memory;

#[cfg(feature = "redis-cache")]
pub use cache::{RedisClient, RedisCodeStore};
#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlUserRepository};
pub use mail::{HttpMailService, MailDispatcher, MockMailService};
pub use memory::{InMemoryCodeStore, InMemoryUserRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[cfg(feature = "mysql")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for the mail provider
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail provider rejected or failed a send
    #[error("Mail service error: {0}")]
    Mail(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DomainError::Fatal { message },
            #[cfg(feature = "mysql")]
            InfrastructureError::Migration(e) => DomainError::fatal(e.to_string()),
            other => DomainError::transient(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_core::errors::ErrorKind;

    #[test]
    fn test_config_error_is_fatal() {
        let err: DomainError = InfrastructureError::Config("bad url".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn test_mail_error_is_transient() {
        let err: DomainError = InfrastructureError::Mail("provider down".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Transient);
    }
}
