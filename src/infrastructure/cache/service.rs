//! Cache service trait and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// What a redirect needs to know about an active code.
///
/// The record id travels with the target so cache hits can still emit visit events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTarget {
    pub id: i64,
    pub original_url: String,
}

/// A cached code: either its live target or a marker that the record was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CacheEntry {
    Active(CachedTarget),
    Deleted,
}

/// Trait for caching code to target mappings.
///
/// Implementations must be thread-safe and fail open: a cache failure degrades to a
/// database lookup, never to a failed request.
///
/// # Consistency
///
/// Lookups fill the cache with [`fill_target`](Self::fill_target), which never replaces an
/// existing entry. Writers replace entries unconditionally: an update stores the new target
/// with [`set_target`](Self::set_target) and a delete stores a tombstone with
/// [`mark_deleted`](Self::mark_deleted). A fill computed from a read that predates the
/// write therefore cannot land over it. Only a failed write leaves a stale entry, which
/// expires with its TTL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached entry for `code`.
    ///
    /// `Ok(None)` on miss, on backend error and on an unreadable entry.
    async fn get_entry(&self, code: &str) -> CacheResult<Option<CacheEntry>>;

    /// Stores a target read from storage, unless an entry for `code` already exists.
    async fn fill_target(&self, code: &str, target: &CachedTarget) -> CacheResult<()>;

    /// Stores a target, replacing any entry. Uses the default TTL when `ttl_seconds` is `None`.
    async fn set_target(
        &self,
        code: &str,
        target: &CachedTarget,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Replaces any entry for `code` with a deletion tombstone.
    async fn mark_deleted(&self, code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
