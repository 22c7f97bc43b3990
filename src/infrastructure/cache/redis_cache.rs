//! Redis-backed cache implementation.

use super::service::{CacheEntry, CacheError, CacheResult, CacheService, CachedTarget};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, ExistenceCheck, SetExpiry, SetOptions, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "code:";

/// Redis cache for redirect targets.
///
/// Entries are JSON-encoded [`CacheEntry`] values under `code:<code>`. Fills use
/// `SET NX`, so they never overwrite a tombstone or a newer target. All operations are
/// fail-open: errors are logged and reported as misses or successes.
pub struct RedisCache {
    manager: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut conn = manager.clone();
        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn key(code: &str) -> String {
        format!("{}{}", KEY_PREFIX, code)
    }

    fn encode(entry: &CacheEntry) -> CacheResult<String> {
        serde_json::to_string(entry).map_err(|e| CacheError::OperationError(e.to_string()))
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_entry(&self, code: &str) -> CacheResult<Option<CacheEntry>> {
        let mut conn = self.manager.clone();

        let raw = match conn.get::<_, Option<String>>(Self::key(code)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(code, error = %e, "Redis GET failed");
                return Ok(None);
            }
        };

        let Some(raw) = raw else {
            debug!(code, "Cache MISS");
            return Ok(None);
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => {
                debug!(code, "Cache HIT");
                Ok(Some(entry))
            }
            Err(e) => {
                warn!(code, error = %e, "Discarding unreadable cache entry");
                Ok(None)
            }
        }
    }

    async fn fill_target(&self, code: &str, target: &CachedTarget) -> CacheResult<()> {
        let payload = Self::encode(&CacheEntry::Active(target.clone()))?;
        let options = SetOptions::default()
            .conditional_set(ExistenceCheck::NX)
            .with_expiration(SetExpiry::EX(self.default_ttl));
        let mut conn = self.manager.clone();

        match conn
            .set_options::<_, _, Option<String>>(Self::key(code), payload, options)
            .await
        {
            Ok(Some(_)) => debug!(code, "Cache FILL"),
            Ok(None) => debug!(code, "Cache FILL skipped, entry exists"),
            Err(e) => warn!(code, error = %e, "Redis SET NX failed"),
        }

        Ok(())
    }

    async fn set_target(
        &self,
        code: &str,
        target: &CachedTarget,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        let payload = Self::encode(&CacheEntry::Active(target.clone()))?;
        let mut conn = self.manager.clone();

        match conn.set_ex::<_, _, ()>(Self::key(code), payload, ttl).await {
            Ok(()) => debug!(code, ttl, "Cache SET"),
            Err(e) => warn!(code, error = %e, "Redis SET failed"),
        }

        Ok(())
    }

    async fn mark_deleted(&self, code: &str) -> CacheResult<()> {
        let payload = Self::encode(&CacheEntry::Deleted)?;
        let mut conn = self.manager.clone();

        match conn
            .set_ex::<_, _, ()>(Self::key(code), payload, self.default_ttl)
            .await
        {
            Ok(()) => debug!(code, "Cache TOMBSTONE"),
            Err(e) => warn!(code, error = %e, "Redis SET tombstone failed"),
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.manager.clone();
        conn.ping::<()>().await.is_ok()
    }
}
