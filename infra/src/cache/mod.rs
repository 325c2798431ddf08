//! Cache module for the Redis-backed verification code store
//!
//! Provides the Redis client with startup connection retries and the
//! `CodeStoreTrait` implementation used by the verification service.

pub mod code_store;
pub mod redis_client;


pub use code_store::RedisCodeStore;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use dl_shared::config::cache::CacheConfig;
