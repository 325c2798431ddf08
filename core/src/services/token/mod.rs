//! Token service module for JWT management
//!
//! Issues stateless access/refresh token pairs and verifies presented
//! tokens. Nothing is persisted; a token is invalidated only by expiry or
//! by rotating the signing secret.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
