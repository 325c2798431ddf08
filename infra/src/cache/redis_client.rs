//! Redis cache client implementation
//!
//! Wraps a multiplexed connection and exposes exactly the primitives the
//! code store needs: set-if-absent with expiry, get and compare-and-delete.
//! Connection establishment retries with exponential backoff; individual
//! commands do not retry and surface errors immediately.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, Script};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use dl_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Deletes KEYS[1] only if it still holds ARGV[1]. Returns 1 on delete.
const COMPARE_AND_DELETE: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

const RETRY_BASE_DELAY_MS: u64 = 100;
const RETRY_MAX_DELAY_MS: u64 = 5000;

/// Redis client for the verification code store
#[derive(Clone, Debug)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
    compare_and_delete: Script,
}

impl RedisClient {
    /// Connect to Redis, retrying `config.connect_retries` times
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client, `Config` for an
    ///   unparseable URL, `Cache` when every attempt fails
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::connect_with_retry(
            &client,
            config.connect_retries.max(1),
            Duration::from_secs(config.connection_timeout),
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            config,
            compare_and_delete: Script::new(COMPARE_AND_DELETE),
        })
    }

    async fn connect_with_retry(
        client: &Client,
        max_attempts: u32,
        timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = RETRY_BASE_DELAY_MS;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Attempting to connect to Redis");

            let result = match tokio::time::timeout(timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result,
                Err(_) => Err(RedisError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "Redis connection timed out",
                ))),
            };

            match result {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_attempts && is_retriable_error(&e) => {
                    warn!(
                        attempt = attempts,
                        max_attempts,
                        delay_ms = delay,
                        error = %e,
                        "Failed to connect to Redis, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(RETRY_MAX_DELAY_MS);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Failed to connect to Redis");
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// `SET key value NX EX ttl`
    ///
    /// # Returns
    /// * `Ok(true)` - The key was written
    /// * `Ok(false)` - The key already existed and was left untouched
    pub async fn set_if_absent_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<bool, InfrastructureError> {
        let key = self.config.make_key(key);
        let mut conn = self.connection.clone();

        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(expiry_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Failed to set key");
                InfrastructureError::Cache(e)
            })?;

        let written = reply.is_some();
        debug!(key = %key, written, expiry_seconds, "SET NX completed");
        Ok(written)
    }

    /// Get a value, `None` when the key is absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = self.config.make_key(key);
        let mut conn = self.connection.clone();

        let value: Option<String> = conn.get(&key).await.map_err(|e| {
            error!(key = %key, error = %e, "Failed to get key");
            InfrastructureError::Cache(e)
        })?;

        debug!(key = %key, found = value.is_some(), "GET completed");
        Ok(value)
    }

    /// Atomically delete `key` if it still holds `expected`
    ///
    /// # Returns
    /// * `Ok(true)` - This call removed the key
    /// * `Ok(false)` - The key was absent or held another value
    pub async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, InfrastructureError> {
        let key = self.config.make_key(key);
        let mut conn = self.connection.clone();

        let removed: i64 = self
            .compare_and_delete
            .key(&key)
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Compare-and-delete failed");
                InfrastructureError::Cache(e)
            })?;

        debug!(key = %key, removed = removed > 0, "Compare-and-delete completed");
        Ok(removed > 0)
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(InfrastructureError::Cache)?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!(response = %response, "Redis health check returned unexpected response");
            Ok(false)
        }
    }
}

/// Whether a connection error is worth another attempt
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError | redis::ErrorKind::BusyLoadingError | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.find('@'), url.find("://")) {
        let proto = &url[..proto_end + 3];
        let host_part = &url[at_pos..];
        return format!("{}****{}", proto, host_part);
    }
    url.to_string()
}
