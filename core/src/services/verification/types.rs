//! Types for verification service results

use chrono::{DateTime, Utc};

use crate::domain::entities::pending::VerificationFlow;

/// Number of digits in a verification code
pub const CODE_LENGTH: usize = 6;

/// Result of issuing a verification code
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub flow: VerificationFlow,
    /// The code mailed to the recipient
    pub code: String,
    /// The message ID from the mail provider
    pub message_id: String,
    /// When the stored payload expires
    pub expires_at: DateTime<Utc>,
}

/// Outbound message handed to the mail collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    /// The bare code, for providers that render their own templates
    pub code: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// The message carrying `code` for `flow`
    pub fn verification_code(to: &str, flow: VerificationFlow, code: &str, ttl_seconds: u64) -> Self {
        let minutes = (ttl_seconds / 60).max(1);
        Self {
            to: to.to_string(),
            code: code.to_string(),
            subject: flow.mail_subject().to_string(),
            body: format!(
                "Your verification code is {}. It expires in {} minute{}.",
                code,
                minutes,
                if minutes == 1 { "" } else { "s" }
            ),
        }
    }
}
