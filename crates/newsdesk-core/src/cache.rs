//! In-memory caching for API responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::config::CACHE_TTL;
use crate::query::QueryParams;

/// Defines how the gateway uses the cache for a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Read from the cache if a fresh entry is present;
    /// otherwise, fetch from the network and write the payload to the cache. (Default)
    #[default]
    Use,
    /// Always fetch from the network, bypassing any cached entry,
    /// and write the new payload to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

impl CacheMode {
    pub const fn reads(self) -> bool {
        matches!(self, Self::Use)
    }

    pub const fn writes(self) -> bool {
        matches!(self, Self::Use | Self::Refresh)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl CacheInner {
    fn get(&mut self, key: &str) -> Option<Value> {
        let entry = self.map.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            self.map.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn put(&mut self, key: String, value: Value) {
        let stored_at = Instant::now();
        self.map.insert(key, CacheEntry { value, stored_at });
    }
}

/// Shared in-memory cache of decoded JSON payloads with a fixed time-to-live.
///
/// Cloning yields another handle onto the same entries.
#[derive(Debug, Clone)]
pub struct CacheStore {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner {
                map: HashMap::new(),
                ttl,
            })),
        }
    }

    /// Create a cache store with the standard 5 minute TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(CACHE_TTL)
    }

    /// Get the value stored under `key` if it is no older than the TTL.
    ///
    /// A stale entry is evicted as a side effect of the lookup.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut store = self.inner.write().await;
        store.get(key)
    }

    /// Store `value` under `key`, replacing any prior entry and restarting its TTL.
    pub async fn put(&self, key: String, value: Value) {
        let mut store = self.inner.write().await;
        store.put(key, value);
    }

    /// Clear all entries from the cache.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }

    /// Number of entries held, including stale ones not yet evicted.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

/// Deterministic cache key: `path?name=value&...` with names in sorted order.
pub fn generate_key(path: &str, params: &QueryParams) -> String {
    format!("{path}?{}", params.to_raw_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_cache_store_basic_operations() {
        let cache = CacheStore::new(Duration::from_secs(1));

        assert!(cache.get("key1").await.is_none());

        cache.put("key1".to_string(), json!({"id": 1})).await;
        assert_eq!(cache.get("key1").await, Some(json!({"id": 1})));

        cache.put("key1".to_string(), json!({"id": 2})).await;
        assert_eq!(cache.get("key1").await, Some(json!({"id": 2})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_is_fresh_up_to_ttl_and_evicted_after() {
        let cache = CacheStore::with_default_ttl();
        cache.put("key1".to_string(), json!("value1")).await;

        tokio::time::advance(CACHE_TTL).await;
        assert_eq!(cache.get("key1").await, Some(json!("value1")));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("key1").await.is_none());
        assert_eq!(cache.len().await, 0, "stale entry must be evicted on read");
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_restarts_ttl() {
        let cache = CacheStore::new(Duration::from_secs(10));
        cache.put("key1".to_string(), json!(1)).await;

        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put("key1".to_string(), json!(2)).await;
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("key1").await, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_cache_clear_all() {
        let cache = CacheStore::new(Duration::from_secs(60));

        cache.put("key1".to_string(), json!("value1")).await;
        cache.put("key2".to_string(), json!("value2")).await;

        assert_eq!(cache.len().await, 2);
        cache.clear().await;
        assert!(cache.is_empty().await);
        assert!(cache.get("key1").await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = CacheStore::new(Duration::from_secs(60));
        let handle = cache.clone();

        handle.put("key1".to_string(), json!(true)).await;
        assert_eq!(cache.get("key1").await, Some(json!(true)));
    }

    #[test]
    fn test_cache_mode_default_and_flags() {
        let mode: CacheMode = Default::default();
        assert_eq!(mode, CacheMode::Use);
        assert!(CacheMode::Use.reads() && CacheMode::Use.writes());
        assert!(!CacheMode::Refresh.reads() && CacheMode::Refresh.writes());
        assert!(!CacheMode::Bypass.reads() && !CacheMode::Bypass.writes());
    }

    #[test]
    fn test_generate_key_ignores_insertion_order() {
        let first = QueryParams::new().with("z", 1).with("a", 2);
        let second = QueryParams::new().with("a", 2).with("z", 1);

        assert_eq!(
            generate_key("/api/news", &first),
            generate_key("/api/news", &second)
        );
        assert_eq!(generate_key("/api/news", &first), "/api/news?a=2&z=1");
    }

    #[test]
    fn test_generate_key_renders_mixed_values() {
        let params = QueryParams::new()
            .with("page", 1)
            .with("active", true)
            .with("category", "tech");

        assert_eq!(
            generate_key("/api/news", &params),
            "/api/news?active=true&category=tech&page=1"
        );
    }
}
