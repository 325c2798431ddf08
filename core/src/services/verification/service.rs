//! Main verification service implementation

use chrono::{Duration, Utc};
use rand::{rngs::OsRng, Rng};
use std::sync::Arc;
use uuid::Uuid;

use dl_shared::utils::email::mask_email;

use crate::domain::entities::pending::PendingPayload;
use crate::errors::{DomainError, DomainResult, VerificationError};

use super::config::VerificationServiceConfig;
use super::traits::{CodeStoreTrait, MailServiceTrait};
use super::types::{IssuedCode, MailMessage, CODE_LENGTH};

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Verification service for issuing and consuming one-time email codes
///
/// Issuing persists first and sends second. A payload is reserved with a
/// set-if-absent write; if the mail collaborator then fails, the reservation
/// is removed again so no live code exists that nobody received.
pub struct VerificationService<M: MailServiceTrait, C: CodeStoreTrait> {
    /// Mail service for delivering codes
    mail_service: Arc<M>,
    /// Store holding pending payloads
    code_store: Arc<C>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<M: MailServiceTrait, C: CodeStoreTrait> VerificationService<M, C> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `mail_service` - Mail service implementation
    /// * `code_store` - Code store implementation
    /// * `config` - Service configuration
    pub fn new(mail_service: Arc<M>, code_store: Arc<C>, config: VerificationServiceConfig) -> Self {
        Self {
            mail_service,
            code_store,
            config,
        }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a code for `payload` and mail it to the payload's recipient
    ///
    /// This method:
    /// 1. Serializes the payload
    /// 2. Reserves a fresh code under the flow's key namespace
    /// 3. Sends the code by mail
    /// 4. Releases the reservation if sending fails
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCode)` - The code and mail provider message ID
    /// * `Err(DomainError)` - `Transient` on store or mail failure
    pub async fn issue<P: PendingPayload>(&self, payload: &P) -> DomainResult<IssuedCode> {
        let flow = P::FLOW;
        let ttl = self.config.ttl_for(flow);
        let recipient = mask_email(payload.recipient());
        let value = serde_json::to_string(payload)
            .map_err(|e| DomainError::fatal(format!("Failed to serialize {} payload: {}", flow, e)))?;
        let expires_at = i64::try_from(ttl)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|expires_in| Utc::now().checked_add_signed(expires_in))
            .ok_or_else(|| DomainError::fatal(format!("Code TTL {}s for {} is out of range", ttl, flow)))?;

        let mut reserved = None;
        for _ in 0..self.config.max_issue_attempts.max(1) {
            let code = Self::generate_code();
            let key = flow.cache_key(&code);

            let stored = self
                .code_store
                .put_if_absent(&key, &value, ttl)
                .await
                .map_err(|e| {
                    tracing::error!(
                        flow = %flow,
                        recipient = %recipient,
                        error = %e,
                        event = "code_storage_failed",
                        "Failed to store verification code"
                    );
                    VerificationError::Store(e)
                })?;

            if stored {
                reserved = Some((code, key));
                break;
            }

            tracing::debug!(flow = %flow, event = "code_collision", "Generated code already in use, drawing another");
        }

        let (code, key) = reserved.ok_or(VerificationError::CodeSpaceExhausted)?;

        let message = MailMessage::verification_code(payload.recipient(), flow, &code, ttl);
        let message_id = match self.mail_service.send(&message).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    flow = %flow,
                    recipient = %recipient,
                    error = %e,
                    event = "code_mail_failed",
                    "Failed to send verification code"
                );
                if let Err(cleanup) = self.code_store.delete_if_equals(&key, &value).await {
                    tracing::warn!(
                        flow = %flow,
                        error = %cleanup,
                        event = "code_release_failed",
                        "Could not release code after mail failure; it will expire on its own"
                    );
                }
                return Err(VerificationError::Mail(e).into());
            }
        };

        tracing::info!(
            flow = %flow,
            recipient = %recipient,
            message_id = %message_id,
            ttl_seconds = ttl,
            event = "code_issued",
            "Verification code issued"
        );

        Ok(IssuedCode {
            flow,
            code,
            message_id,
            expires_at,
        })
    }

    /// Consume a code and return the payload stored under it
    ///
    /// The stored payload must match `email` (and `user_id` for flows bound
    /// to an account). A mismatch leaves the code in place. On a match the
    /// key is removed with a compare-and-delete, so of several concurrent
    /// consumers exactly one receives the payload and the rest see
    /// `CodeNotFound`.
    pub async fn consume<P: PendingPayload>(
        &self,
        code: &str,
        email: &str,
        user_id: Option<Uuid>,
    ) -> DomainResult<P> {
        let flow = P::FLOW;
        if !Self::is_well_formed(code) {
            return Err(VerificationError::CodeNotFound.into());
        }

        let key = flow.cache_key(code);
        let raw = self
            .code_store
            .get(&key)
            .await
            .map_err(VerificationError::Store)?
            .ok_or(VerificationError::CodeNotFound)?;

        let payload: P = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(flow = %flow, error = %e, event = "code_payload_corrupt", "Stored payload could not be decoded");
            VerificationError::CorruptPayload(e.to_string())
        })?;

        if !payload.matches(email, user_id) {
            tracing::warn!(
                flow = %flow,
                presented = %mask_email(email),
                event = "code_identity_mismatch",
                "Verification code presented for a different identity"
            );
            return Err(VerificationError::Mismatch.into());
        }

        let removed = self
            .code_store
            .delete_if_equals(&key, &raw)
            .await
            .map_err(|e| {
                tracing::error!(flow = %flow, error = %e, event = "code_delete_failed", "Failed to delete consumed code");
                VerificationError::Store(e)
            })?;

        if !removed {
            tracing::info!(flow = %flow, event = "code_already_consumed", "Code was consumed by a concurrent request");
            return Err(VerificationError::CodeNotFound.into());
        }

        tracing::info!(
            flow = %flow,
            recipient = %mask_email(payload.recipient()),
            event = "code_consumed",
            "Verification code consumed"
        );

        Ok(payload)
    }

    /// Draw a code uniformly from 100000..=999999 using the OS CSPRNG
    pub fn generate_code() -> String {
        OsRng.gen_range(CODE_MIN..=CODE_MAX).to_string()
    }

    fn is_well_formed(code: &str) -> bool {
        code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
    }
}
