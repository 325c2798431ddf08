//! Verification service module for email-based one-time codes
//!
//! This module provides the code workflow shared by registration, password
//! reset and email change:
//! - Code generation and reservation in the cache
//! - Mail dispatch through an external collaborator
//! - One-shot consumption guarded by an atomic compare-and-delete

mod config;
mod service;
mod traits;
mod types;


pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::{CodeStoreTrait, MailServiceTrait};
pub use types::{IssuedCode, MailMessage, CODE_LENGTH};
