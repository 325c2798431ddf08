use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, Instant};

use dl_core::services::verification::CodeStoreTrait;

/// Code store with per-key expiry. Expired entries are dropped on every
/// write and lazily on reads. All operations hold one lock, which makes
/// compare-and-delete atomic.
#[derive(Clone, Default)]
pub struct InMemoryCodeStore {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.lock()
            .map(|entries| entries.values().filter(|(_, exp)| *exp > Instant::now()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries held in the map, expired ones included
    #[cfg(test)]
    pub(crate) fn stored(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>, String> {
        self.entries
            .lock()
            .map_err(|_| "Code store lock poisoned".to_string())
    }
}

fn live<'a>(entries: &'a mut HashMap<String, (String, Instant)>, key: &str) -> Option<&'a String> {
    if matches!(entries.get(key), Some((_, exp)) if *exp <= Instant::now()) {
        entries.remove(key);
    }
    entries.get(key).map(|(value, _)| value)
}

#[async_trait]
impl CodeStoreTrait for InMemoryCodeStore {
    async fn put_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(ttl_seconds))
            .ok_or_else(|| format!("TTL of {}s is out of range", ttl_seconds))?;

        let mut entries = self.lock()?;
        entries.retain(|_, (_, exp)| *exp > now);
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), (value.to_string(), expires_at));
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        let mut entries = self.lock()?;
        Ok(live(&mut entries, key).cloned())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        let mut entries = self.lock()?;
        if live(&mut entries, key).map(String::as_str) == Some(expected) {
            entries.remove(key);
            return Ok(true);
        }
        Ok(false)
    }
}
