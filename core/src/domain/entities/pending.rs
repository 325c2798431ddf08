//! Payloads parked in the verification cache until their code is consumed.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dl_shared::utils::email::emails_match;

use super::user::{Gender, Role};

/// The three flows that issue codes. Each flow owns its own key namespace,
/// so equal numeric codes in different flows never overwrite each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationFlow {
    Registration,
    PasswordReset,
    EmailChange,
}

impl VerificationFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationFlow::Registration => "registration",
            VerificationFlow::PasswordReset => "password_reset",
            VerificationFlow::EmailChange => "email_change",
        }
    }

    /// Cache key holding the payload for `code`
    pub fn cache_key(&self, code: &str) -> String {
        format!("verification:{}:{}", self.as_str(), code)
    }

    pub fn mail_subject(&self) -> &'static str {
        match self {
            VerificationFlow::Registration => "Confirm your email address",
            VerificationFlow::PasswordReset => "Password reset code",
            VerificationFlow::EmailChange => "Confirm your new email address",
        }
    }
}

impl std::fmt::Display for VerificationFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload that can be stored under a verification code.
pub trait PendingPayload: Serialize + DeserializeOwned + Send + Sync {
    const FLOW: VerificationFlow;

    /// Address the code is mailed to
    fn recipient(&self) -> &str;

    /// Whether a consumer presenting `email` (and `user_id`, for flows bound
    /// to an authenticated account) is the one the code was issued for.
    fn matches(&self, email: &str, _user_id: Option<Uuid>) -> bool {
        emails_match(self.recipient(), email)
    }
}

/// Registration data held until the email is confirmed.
/// The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl PendingPayload for PendingRegistration {
    const FLOW: VerificationFlow = VerificationFlow::Registration;

    fn recipient(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPasswordReset {
    pub email: String,
}

impl PendingPayload for PendingPasswordReset {
    const FLOW: VerificationFlow = VerificationFlow::PasswordReset;

    fn recipient(&self) -> &str {
        &self.email
    }
}

/// Email change requested by an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEmailChange {
    pub user_id: Uuid,
    pub new_email: String,
}

impl PendingPayload for PendingEmailChange {
    const FLOW: VerificationFlow = VerificationFlow::EmailChange;

    fn recipient(&self) -> &str {
        &self.new_email
    }

    fn matches(&self, email: &str, user_id: Option<Uuid>) -> bool {
        user_id == Some(self.user_id) && emails_match(&self.new_email, email)
    }
}
