//! HTTP mail provider
//!
//! Posts each message as JSON to a transactional mail API:
//!
//! ```json
//! { "from": "...", "to": "...", "subject": "...", "text": "...", "code": "123456" }
//! ```
//!
//! The API key, when configured, is sent as a bearer token. Any 2xx response
//! counts as accepted; the message ID is read from an `id` or `message_id`
//! field of the response body when present. Sends are not retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use dl_core::services::verification::{MailMessage, MailServiceTrait};
use dl_shared::config::MailConfig;
use dl_shared::utils::email::mask_email;

use crate::InfrastructureError;

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    id: Option<String>,
    message_id: Option<String>,
}

/// Mail sender backed by an HTTP API
#[derive(Clone)]
pub struct HttpMailService {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from_address: String,
}

impl HttpMailService {
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        let endpoint = config
            .endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| InfrastructureError::Config("MAIL_ENDPOINT is required for the http provider".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::Config(format!("Failed to build mail HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            from_address: config.from_address.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, message: &MailMessage) -> Result<String, InfrastructureError> {
        let body = SendRequest {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
            code: &message.code,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::Mail(format!(
                "Provider responded with status {}",
                status
            )));
        }

        let parsed: SendResponse = response.json().await.unwrap_or_default();
        Ok(parsed
            .id
            .or(parsed.message_id)
            .unwrap_or_else(|| format!("http-{}", uuid::Uuid::new_v4())))
    }
}

#[async_trait]
impl MailServiceTrait for HttpMailService {
    async fn send(&self, message: &MailMessage) -> Result<String, String> {
        match self.post(message).await {
            Ok(message_id) => {
                info!(
                    recipient = %mask_email(&message.to),
                    message_id = %message_id,
                    "Mail accepted by provider"
                );
                Ok(message_id)
            }
            Err(e) => {
                error!(recipient = %mask_email(&message.to), error = %e, "Mail send failed");
                Err(e.to_string())
            }
        }
    }
}
