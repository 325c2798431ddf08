//! Shared utilities and common types for the Auth service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Utility functions (email normalization and masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, ConfigError, DatabaseConfig, Environment, JwtConfig,
    LogFormat, LoggingConfig, MailConfig, MailProvider, ServerConfig, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus, MessageResponse};
pub use utils::email;
