//! Mail module
//!
//! Delivers verification codes through the provider selected in
//! `MailConfig`:
//!
//! - **Mock**: logs the message and keeps the last one per recipient
//! - **Http**: JSON POST to a transactional mail API
//!
//! Recipient addresses are masked in logs.

pub mod http;
pub mod mock;


use async_trait::async_trait;

use dl_core::services::verification::{MailMessage, MailServiceTrait};
use dl_shared::config::{MailConfig, MailProvider};

use crate::InfrastructureError;

pub use http::HttpMailService;
pub use mock::MockMailService;

/// The configured mail sender
#[derive(Clone)]
pub enum MailDispatcher {
    Mock(MockMailService),
    Http(HttpMailService),
}

impl MailDispatcher {
    /// Build the sender named by `config.provider`
    ///
    /// # Returns
    /// * `Err(InfrastructureError::Config)` - `http` without an endpoint, or
    ///   an HTTP client that cannot be built
    pub fn from_config(config: &MailConfig) -> Result<Self, InfrastructureError> {
        match config.provider {
            MailProvider::Mock => {
                tracing::warn!("Using mock mail service, codes are only written to the log");
                Ok(MailDispatcher::Mock(MockMailService::new()))
            }
            MailProvider::Http => Ok(MailDispatcher::Http(HttpMailService::new(config)?)),
        }
    }

    pub fn provider(&self) -> MailProvider {
        match self {
            MailDispatcher::Mock(_) => MailProvider::Mock,
            MailDispatcher::Http(_) => MailProvider::Http,
        }
    }
}

#[async_trait]
impl MailServiceTrait for MailDispatcher {
    async fn send(&self, message: &MailMessage) -> Result<String, String> {
        match self {
            MailDispatcher::Mock(service) => service.send(message).await,
            MailDispatcher::Http(service) => service.send(message).await,
        }
    }
}
