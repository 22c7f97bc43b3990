//! In-process cache for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::service::{CacheEntry, CacheResult, CacheService, CachedTarget};
use async_trait::async_trait;

/// Map-backed [`CacheService`] with the same write rules as [`super::RedisCache`].
///
/// Entries never expire.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, code: &str) -> Option<CacheEntry> {
        self.entries.lock().unwrap().get(code).cloned()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_entry(&self, code: &str) -> CacheResult<Option<CacheEntry>> {
        Ok(self.entry(code))
    }

    async fn fill_target(&self, code: &str, target: &CachedTarget) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .entry(code.to_string())
            .or_insert_with(|| CacheEntry::Active(target.clone()));
        Ok(())
    }

    async fn set_target(
        &self,
        code: &str,
        target: &CachedTarget,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), CacheEntry::Active(target.clone()));
        Ok(())
    }

    async fn mark_deleted(&self, code: &str) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), CacheEntry::Deleted);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(url: &str) -> CachedTarget {
        CachedTarget {
            id: 1,
            original_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fill_does_not_replace_tombstone() {
        let cache = MemoryCache::new();

        cache.mark_deleted("000001").await.unwrap();
        cache
            .fill_target("000001", &target("https://example.com"))
            .await
            .unwrap();

        assert_eq!(cache.entry("000001"), Some(CacheEntry::Deleted));
    }

    #[tokio::test]
    async fn test_set_replaces_filled_target() {
        let cache = MemoryCache::new();

        cache
            .fill_target("000001", &target("https://old.example.com"))
            .await
            .unwrap();
        cache
            .set_target("000001", &target("https://new.example.com"), None)
            .await
            .unwrap();

        assert_eq!(
            cache.entry("000001"),
            Some(CacheEntry::Active(target("https://new.example.com")))
        );
    }

    #[test]
    fn test_entry_json_shape() {
        let active = serde_json::to_value(CacheEntry::Active(target("https://example.com"))).unwrap();
        assert_eq!(active["state"], "active");
        assert_eq!(active["id"], 1);
        assert_eq!(active["original_url"], "https://example.com");

        let deleted = serde_json::to_value(CacheEntry::Deleted).unwrap();
        assert_eq!(deleted, serde_json::json!({ "state": "deleted" }));
    }
}
