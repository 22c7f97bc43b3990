//! Caching layer for redirect lookups.
//!
//! - [`RedisCache`] - Redis-backed cache
//! - [`NullCache`] - No-op implementation used when Redis is not configured

#[cfg(test)]
mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
#[cfg(test)]
pub use memory_cache::MemoryCache;
#[cfg(test)]
pub use service::MockCacheService;
pub use service::{CacheEntry, CacheError, CacheResult, CacheService, CachedTarget};
