//! Configuration for the verification service

use dl_shared::config::VerificationConfig;

use crate::domain::entities::pending::VerificationFlow;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Registration code lifetime in seconds
    pub registration_ttl_seconds: u64,
    /// Password reset code lifetime in seconds
    pub password_reset_ttl_seconds: u64,
    /// Email change code lifetime in seconds
    pub email_change_ttl_seconds: u64,
    /// Fresh codes drawn when the first one collides with a live key
    pub max_issue_attempts: u32,
}

impl VerificationServiceConfig {
    pub fn ttl_for(&self, flow: VerificationFlow) -> u64 {
        match flow {
            VerificationFlow::Registration => self.registration_ttl_seconds,
            VerificationFlow::PasswordReset => self.password_reset_ttl_seconds,
            VerificationFlow::EmailChange => self.email_change_ttl_seconds,
        }
    }
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            registration_ttl_seconds: config.registration_ttl,
            password_reset_ttl_seconds: config.password_reset_ttl,
            email_change_ttl_seconds: config.email_change_ttl,
            max_issue_attempts: 5,
        }
    }
}
