//! Verification code lifetimes

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Longest accepted code TTL (one day)
pub const MAX_CODE_TTL_SECONDS: u64 = 86_400;

/// Per-flow TTLs, in seconds, for codes held in the cache
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Pending registration lifetime
    #[serde(default = "default_registration_ttl")]
    pub registration_ttl: u64,

    /// Pending password reset lifetime
    #[serde(default = "default_password_reset_ttl")]
    pub password_reset_ttl: u64,

    /// Pending email change lifetime
    #[serde(default = "default_email_change_ttl")]
    pub email_change_ttl: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            registration_ttl: default_registration_ttl(),
            password_reset_ttl: default_password_reset_ttl(),
            email_change_ttl: default_email_change_ttl(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        fn read(key: &str, default: u64) -> u64 {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        Self {
            registration_ttl: read("VERIFICATION_REGISTRATION_TTL", default_registration_ttl()),
            password_reset_ttl: read("VERIFICATION_PASSWORD_RESET_TTL", default_password_reset_ttl()),
            email_change_ttl: read("VERIFICATION_EMAIL_CHANGE_TTL", default_email_change_ttl()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (flow, ttl) in [
            ("registration", self.registration_ttl),
            ("password_reset", self.password_reset_ttl),
            ("email_change", self.email_change_ttl),
        ] {
            if ttl == 0 {
                return Err(ConfigError::ZeroCodeTtl { flow });
            }
            if ttl > MAX_CODE_TTL_SECONDS {
                return Err(ConfigError::CodeTtlTooLong {
                    flow,
                    ttl,
                    max: MAX_CODE_TTL_SECONDS,
                });
            }
        }
        Ok(())
    }
}

fn default_registration_ttl() -> u64 {
    180 // 3 minutes
}

fn default_password_reset_ttl() -> u64 {
    180 // 3 minutes
}

fn default_email_change_ttl() -> u64 {
    900 // 15 minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerificationConfig::default();
        assert_eq!(config.registration_ttl, 180);
        assert_eq!(config.password_reset_ttl, 180);
        assert_eq!(config.email_change_ttl, 900);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = VerificationConfig {
            email_change_ttl: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCodeTtl { flow: "email_change" })
        );
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        let config = VerificationConfig {
            password_reset_ttl: 1 << 62,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CodeTtlTooLong {
                flow: "password_reset",
                ttl: 1 << 62,
                max: MAX_CODE_TTL_SECONDS,
            })
        );

        let config = VerificationConfig {
            registration_ttl: MAX_CODE_TTL_SECONDS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
