use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use crate::error::ApiError;

struct Entry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// Process-wide keyed response cache with per-entry TTL. Constructed once
/// and passed by reference; tests inject a fresh instance instead of
/// sharing hidden module state.
pub struct DataCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl DataCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if still fresh, otherwise run the
    /// fetcher and cache its result for `ttl`. Fetch failures are not cached.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetcher: F,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let now = Utc::now();
        {
            let entries = self.entries.lock().unwrap();
            if let Some(entry) = entries.get(key) {
                if now < entry.expires_at {
                    return Ok(serde_json::from_value(entry.value.clone())?);
                }
            }
        }

        let value = fetcher().await?;
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry {
                value: serde_json::to_value(&value)?,
                expires_at: now + ttl,
            },
        );
        Ok(value)
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Drop stale entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }
}

impl Default for DataCache {
    fn default() -> Self {
        Self::new()
    }
}
