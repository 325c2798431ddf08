//! Mock mail service for development and testing
//!
//! Logs messages instead of sending them. The code itself is only logged at
//! debug level.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use dl_core::services::verification::{MailMessage, MailServiceTrait};
use dl_shared::utils::email::mask_email;

/// Mock mail service
///
/// This implementation:
/// - Logs each message with a masked recipient
/// - Generates mock message IDs
/// - Keeps the last message per recipient so tests can read codes back
#[derive(Clone, Default)]
pub struct MockMailService {
    message_count: Arc<AtomicU64>,
    last_messages: Arc<RwLock<HashMap<String, MailMessage>>>,
    simulate_failure: Arc<AtomicBool>,
}

impl MockMailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Most recent message sent to `to`
    pub fn last_message_for(&self, to: &str) -> Option<MailMessage> {
        self.last_messages
            .read()
            .ok()
            .and_then(|messages| messages.get(to).cloned())
    }

    /// Code carried by the most recent message sent to `to`
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.last_message_for(to).map(|m| m.code)
    }
}

#[async_trait]
impl MailServiceTrait for MockMailService {
    async fn send(&self, message: &MailMessage) -> Result<String, String> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(recipient = %mask_email(&message.to), "Simulated mail failure");
            return Err("Simulated mail failure".to_string());
        }

        let message_id = format!("mock-{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut messages) = self.last_messages.write() {
            messages.insert(message.to.clone(), message.clone());
        }

        info!(
            recipient = %mask_email(&message.to),
            subject = %message.subject,
            message_id = %message_id,
            "Mock mail sent"
        );
        debug!(recipient = %mask_email(&message.to), code = %message.code, "Mock mail code");

        Ok(message_id)
    }
}
