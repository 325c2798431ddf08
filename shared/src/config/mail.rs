//! Outbound mail configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Which mail backend delivers verification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Log the message instead of sending it
    #[default]
    Mock,
    /// POST a JSON message to an HTTP mail API
    Http,
}

impl std::str::FromStr for MailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" | "log" => Ok(MailProvider::Mock),
            "http" | "api" => Ok(MailProvider::Http),
            _ => Err(format!("Invalid mail provider: {}", s)),
        }
    }
}

impl std::fmt::Display for MailProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailProvider::Mock => write!(f, "mock"),
            MailProvider::Http => write!(f, "http"),
        }
    }
}

/// Mail provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    #[serde(default)]
    pub provider: MailProvider,

    /// Provider endpoint accepting `{from, to, subject, text}`
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for the provider
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sender address
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: MailProvider::default(),
            endpoint: None,
            api_key: None,
            from_address: default_from_address(),
            timeout_secs: default_timeout(),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let provider = std::env::var("MAIL_PROVIDER")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_default();

        Self {
            provider,
            endpoint: std::env::var("MAIL_ENDPOINT").ok(),
            api_key: std::env::var("MAIL_API_KEY").ok(),
            from_address: std::env::var("MAIL_FROM").unwrap_or_else(|_| default_from_address()),
            timeout_secs: std::env::var("MAIL_TIMEOUT")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider == MailProvider::Http && self.endpoint.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::MissingMailEndpoint(self.provider.to_string()));
        }
        Ok(())
    }
}

fn default_from_address() -> String {
    String::from("no-reply@delivery.local")
}

fn default_timeout() -> u64 {
    10
}
