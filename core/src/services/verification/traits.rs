//! Traits for mail and code store integration

use async_trait::async_trait;

use super::types::MailMessage;

/// Trait for mail service integration
#[async_trait]
pub trait MailServiceTrait: Send + Sync {
    /// Deliver a message. Returns the provider's message ID.
    async fn send(&self, message: &MailMessage) -> Result<String, String>;
}

/// Trait for the key-value store holding pending payloads
#[async_trait]
pub trait CodeStoreTrait: Send + Sync {
    /// Store `value` under `key` with a TTL unless the key already exists.
    /// Returns `false` when the key was taken.
    async fn put_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String>;

    /// Read the value under `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Atomically delete `key` only if it still holds `expected`.
    /// Returns `true` when this call removed it.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String>;
}
