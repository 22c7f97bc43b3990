//! No-op cache used when Redis is not configured.

use super::service::{CacheEntry, CacheResult, CacheService, CachedTarget};
use async_trait::async_trait;
use tracing::debug;

/// A cache that never stores anything.
///
/// Every lookup misses, so all redirects go to the database.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_entry(&self, _code: &str) -> CacheResult<Option<CacheEntry>> {
        Ok(None)
    }

    async fn fill_target(&self, _code: &str, _target: &CachedTarget) -> CacheResult<()> {
        Ok(())
    }

    async fn set_target(
        &self,
        _code: &str,
        _target: &CachedTarget,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn mark_deleted(&self, _code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
