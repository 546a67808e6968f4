//! Namespaced in-memory cache with per-entry TTL.
//!
//! The cache is an optimization only. Every operation absorbs failures
//! internally and reports them as a miss/no-op: a disabled or broken cache
//! must never turn into a request error. Callers treat `None`/`false`/`0`
//! exactly like a cold cache.
//!
//! Keys are `namespace:content-hash`. Composite lookups (query + filter
//! parameters) are serialized to canonical JSON and hashed so that identical
//! logical queries land in the same slot regardless of formatting.

use std::time::{Duration, Instant};

use moka::{sync::Cache, Expiry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Default capacity for the backing cache.
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Length of the hex content-hash used in keys.
const HASH_LEN: usize = 16;

/// A cached value with its own TTL.
#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Option<Duration>,
}

/// Expiry policy that honors the TTL stored on each entry.
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }
}

/// Namespaced TTL cache shared by the embedding service and search engine.
///
/// Values are stored as JSON strings, so anything `Serialize`/`Deserialize`
/// can be cached. Safe for concurrent use; per-key operations are atomic.
pub struct MemoryCache {
    cache: Cache<String, Entry>,
    enabled: bool,
}

impl MemoryCache {
    /// Create a cache with the default capacity.
    pub fn new(enabled: bool) -> Self {
        Self::with_capacity(enabled, DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache with an explicit max entry count.
    pub fn with_capacity(enabled: bool, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryExpiry)
            .build();

        Self { cache, enabled }
    }

    /// Create a disabled cache: every operation is a no-op.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Whether the cache backend is usable.
    pub fn healthy(&self) -> bool {
        self.enabled
    }

    /// Hash any serializable value into a fixed-length cache key component.
    ///
    /// Struct fields serialize in declaration order, so the same logical
    /// value always produces the same key.
    pub fn hash_key<T: Serialize>(value: &T) -> String {
        let canonical = serde_json::to_string(value).unwrap_or_default();
        let digest = Sha256::digest(canonical.as_bytes());
        let mut hex = String::with_capacity(HASH_LEN);
        for byte in digest.iter().take(HASH_LEN / 2) {
            hex.push_str(&format!("{:02x}", byte));
        }
        hex
    }

    fn full_key(namespace: &str, key: &str) -> String {
        format!("{}:{}", namespace, key)
    }

    /// Get a value from the cache. Any failure is a miss.
    pub fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }

        let cache_key = Self::full_key(namespace, key);
        match self.cache.get(&cache_key) {
            Some(entry) => match serde_json::from_str(&entry.value) {
                Ok(value) => {
                    tracing::debug!("cache hit: {}", cache_key);
                    Some(value)
                }
                Err(e) => {
                    // A corrupt entry is evicted and reported as a miss.
                    tracing::error!("cache decode error for {}: {}", cache_key, e);
                    self.cache.invalidate(&cache_key);
                    None
                }
            },
            None => {
                tracing::debug!("cache miss: {}", cache_key);
                None
            }
        }
    }

    /// Store a value. Returns whether the value was actually cached.
    pub fn set<T: Serialize>(
        &self,
        namespace: &str,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> bool {
        if !self.enabled {
            return false;
        }

        let value_json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("cache encode error: {}", e);
                return false;
            }
        };

        let cache_key = Self::full_key(namespace, key);
        tracing::debug!("cache store: {} (ttl: {:?})", cache_key, ttl);
        self.cache.insert(
            cache_key,
            Entry {
                value: value_json,
                ttl,
            },
        );
        true
    }

    /// Remove a single entry.
    pub fn delete(&self, namespace: &str, key: &str) -> bool {
        if !self.enabled {
            return false;
        }

        self.cache.invalidate(&Self::full_key(namespace, key));
        true
    }

    /// Best-effort removal of every entry in a namespace.
    ///
    /// Returns the number of entries removed; 0 when nothing matched or the
    /// cache is disabled.
    pub fn invalidate_namespace(&self, namespace: &str) -> u64 {
        if !self.enabled {
            return 0;
        }

        let prefix = format!("{}:", namespace);
        let matching: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        let count = matching.len() as u64;
        for key in matching {
            self.cache.invalidate(&key);
        }

        if count > 0 {
            tracing::info!("invalidated {} cache entries ({}*)", count, prefix);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Payload {
        query: String,
        limit: u32,
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let cache = MemoryCache::new(true);
        let payload = Payload {
            query: "수강신청".to_string(),
            limit: 5,
        };

        assert!(cache.set("search", "abc", &payload, None));
        let got: Option<Payload> = cache.get("search", "abc");
        assert_eq!(got, Some(payload));
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = MemoryCache::new(true);
        let got: Option<Payload> = cache.get("search", "missing");
        assert!(got.is_none());
    }

    #[test]
    fn test_disabled_cache_is_silent() {
        let cache = MemoryCache::disabled();
        let payload = Payload {
            query: "q".to_string(),
            limit: 1,
        };

        assert!(!cache.healthy());
        assert!(!cache.set("search", "k", &payload, None));
        let got: Option<Payload> = cache.get("search", "k");
        assert!(got.is_none());
        assert_eq!(cache.invalidate_namespace("search"), 0);
        assert!(!cache.delete("search", "k"));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new(true);
        cache.set("embedding", "k", &vec![1.0_f32], Some(Duration::from_millis(40)));

        let before: Option<Vec<f32>> = cache.get("embedding", "k");
        assert!(before.is_some());

        std::thread::sleep(Duration::from_millis(80));
        let after: Option<Vec<f32>> = cache.get("embedding", "k");
        assert!(after.is_none());
    }

    #[test]
    fn test_invalidate_namespace_counts_matches() {
        let cache = MemoryCache::new(true);
        cache.set("search", "a", &1_u32, None);
        cache.set("search", "b", &2_u32, None);
        cache.set("embedding", "c", &3_u32, None);
        cache.cache.run_pending_tasks();

        assert_eq!(cache.invalidate_namespace("search"), 2);
        let a: Option<u32> = cache.get("search", "a");
        assert!(a.is_none());
        let c: Option<u32> = cache.get("embedding", "c");
        assert_eq!(c, Some(3));
    }

    #[test]
    fn test_invalidate_empty_namespace_is_zero() {
        let cache = MemoryCache::new(true);
        assert_eq!(cache.invalidate_namespace("nothing"), 0);
    }

    #[test]
    fn test_hash_key_is_stable_and_distinct() {
        let a = Payload {
            query: "휴학 신청".to_string(),
            limit: 5,
        };
        let b = Payload {
            query: "휴학 신청".to_string(),
            limit: 5,
        };
        let c = Payload {
            query: "휴학 신청".to_string(),
            limit: 10,
        };

        assert_eq!(MemoryCache::hash_key(&a), MemoryCache::hash_key(&b));
        assert_ne!(MemoryCache::hash_key(&a), MemoryCache::hash_key(&c));
        assert_eq!(MemoryCache::hash_key(&a).len(), 16);
    }
}
