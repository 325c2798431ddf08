//! Redis implementation of the verification code store

use async_trait::async_trait;

use dl_core::services::verification::CodeStoreTrait;

use super::RedisClient;

/// Stores pending verification payloads in Redis.
///
/// Keys arrive already namespaced per flow
/// (`verification:{flow}:{code}`); the client adds the configured prefix.
#[derive(Clone)]
pub struct RedisCodeStore {
    client: RedisClient,
}

impl RedisCodeStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

#[async_trait]
impl CodeStoreTrait for RedisCodeStore {
    async fn put_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String> {
        self.client
            .set_if_absent_with_expiry(key, value, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.client.get(key).await.map_err(|e| e.to_string())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        self.client
            .delete_if_equals(key, expected)
            .await
            .map_err(|e| e.to_string())
    }
}
