//! Code resolution for redirects.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::codec;
use crate::domain::repositories::ShortUrlRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheEntry, CacheService, CachedTarget};

/// Resolves codes to destination URLs and queues visit counting.
///
/// The visit increment is handed to the background worker with `try_send`, so a redirect
/// never waits on the counter. When the queue is full the event is handed to a detached
/// task that waits for room. Only a closed queue loses the visit, which is counted in
/// `visit_events_dropped_total`.
pub struct RedirectService<R: ShortUrlRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    visit_sender: mpsc::Sender<VisitEvent>,
}

impl<R: ShortUrlRepository> RedirectService<R> {
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        visit_sender: mpsc::Sender<VisitEvent>,
    ) -> Self {
        Self {
            repository,
            cache,
            visit_sender,
        }
    }

    /// Returns the destination of the active record for `code`.
    ///
    /// Codes that cannot have been issued (wrong width or foreign symbols) are reported as
    /// not found without a storage lookup, as are codes cached as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active record has this code.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !codec::is_well_formed(code) {
            debug!(code, "Rejecting malformed code");
            return Err(not_found(code));
        }

        let target = match self.cache.get_entry(code).await {
            Ok(Some(CacheEntry::Active(target))) => target,
            Ok(Some(CacheEntry::Deleted)) => return Err(not_found(code)),
            _ => self.load_target(code).await?,
        };

        self.enqueue_visit(target.id, code);

        Ok(target.original_url)
    }

    async fn load_target(&self, code: &str) -> Result<CachedTarget, AppError> {
        let record = self
            .repository
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        let target = CachedTarget {
            id: record.id,
            original_url: record.original_url,
        };

        let cache = self.cache.clone();
        let cache_code = code.to_string();
        let cache_target = target.clone();
        tokio::spawn(async move {
            let _ = cache.fill_target(&cache_code, &cache_target).await;
        });

        Ok(target)
    }

    fn enqueue_visit(&self, short_url_id: i64, code: &str) {
        match self.visit_sender.try_send(VisitEvent::new(short_url_id, code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("visit_events_deferred_total").increment(1);
                debug!(short_url_id, code, "Visit queue full, deferring event");

                let sender = self.visit_sender.clone();
                tokio::spawn(async move {
                    if let Err(mpsc::error::SendError(event)) = sender.send(event).await {
                        visit_dropped(&event);
                    }
                });
            }
            Err(TrySendError::Closed(event)) => visit_dropped(&event),
        }
    }
}

fn visit_dropped(event: &VisitEvent) {
    metrics::counter!("visit_events_dropped_total").increment(1);
    warn!(
        short_url_id = event.short_url_id,
        code = %event.code,
        "Visit queue closed, visit not counted"
    );
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::short_url::sample;
    use crate::domain::repositories::MockShortUrlRepository;
    use crate::application::services::link_service::LinkService;
    use crate::infrastructure::cache::{MemoryCache, MockCacheService, NullCache};

    fn service(
        repo: MockShortUrlRepository,
        cache: Arc<dyn CacheService>,
        capacity: usize,
    ) -> (
        RedirectService<MockShortUrlRepository>,
        mpsc::Receiver<VisitEvent>,
    ) {
        let (tx, rx) = mpsc::channel(capacity);
        (RedirectService::new(Arc::new(repo), cache, tx), rx)
    }

    #[tokio::test]
    async fn test_resolve_returns_url_and_queues_visit() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code()
            .withf(|code| code == "000001")
            .times(1)
            .returning(|code| Ok(Some(sample(1, code, "https://example.com", None))));

        let (service, mut rx) = service(repo, Arc::new(NullCache::new()), 8);

        let url = service.resolve("000001").await.unwrap();

        assert_eq!(url, "https://example.com");
        assert_eq!(rx.try_recv().unwrap(), VisitEvent::new(1, "000001"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let (service, mut rx) = service(repo, Arc::new(NullCache::new()), 8);

        let result = service.resolve("zzzzzz").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_storage() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code().times(0);

        let (service, _rx) = service(repo, Arc::new(NullCache::new()), 8);

        for code in ["abc", "0000001", "00-001", "favicon.ico"] {
            let result = service.resolve(code).await;
            assert!(matches!(result, Err(AppError::NotFound { .. })), "{code}");
        }
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_still_counts_visit() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code().times(0);

        let mut cache = MockCacheService::new();
        cache
            .expect_get_entry()
            .withf(|code| code == "00000a")
            .times(1)
            .returning(|_| {
                Ok(Some(CacheEntry::Active(CachedTarget {
                    id: 10,
                    original_url: "https://cached.example.com".to_string(),
                })))
            });
        cache.expect_fill_target().times(0);

        let (service, mut rx) = service(repo, Arc::new(cache), 8);

        let url = service.resolve("00000a").await.unwrap();

        assert_eq!(url, "https://cached.example.com");
        assert_eq!(rx.try_recv().unwrap().short_url_id, 10);
    }

    #[tokio::test]
    async fn test_resolve_defers_visit_when_queue_full() {
        const REDIRECTS: usize = 20;

        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code()
            .times(REDIRECTS)
            .returning(|code| Ok(Some(sample(3, code, "https://example.com", None))));

        let (service, mut rx) = service(repo, Arc::new(NullCache::new()), 2);

        for _ in 0..REDIRECTS {
            assert!(service.resolve("000003").await.is_ok());
        }

        for _ in 0..REDIRECTS {
            let event = rx.recv().await.unwrap();
            assert_eq!(event, VisitEvent::new(3, "000003"));
        }
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_cached_tombstone_is_not_found() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code().times(0);

        let cache = MemoryCache::new();
        cache.mark_deleted("000002").await.unwrap();

        let (service, mut rx) = service(repo, Arc::new(cache), 8);

        let result = service.resolve("000002").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delete_during_cache_fill_stays_deleted() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code()
            .times(1)
            .returning(|code| Ok(Some(sample(1, code, "https://example.com", Some("u1")))));
        repo.expect_find_active_by_id()
            .times(1)
            .returning(|id| Ok(Some(sample(id, "000001", "https://example.com", Some("u1")))));
        repo.expect_soft_delete().times(1).returning(|_| Ok(true));
        let repo = Arc::new(repo);

        let cache: Arc<dyn CacheService> = Arc::new(MemoryCache::new());
        let (tx, _rx) = mpsc::channel(8);
        let redirects = RedirectService::new(repo.clone(), cache.clone(), tx);
        let links = LinkService::new(repo, cache);

        // The miss spawns a fill that has not run yet on this single-threaded runtime.
        assert_eq!(redirects.resolve("000001").await.unwrap(), "https://example.com");
        links.delete(1, "u1").await.unwrap();
        tokio::task::yield_now().await;

        let result = redirects.resolve("000001").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_during_cache_fill_keeps_new_target() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code()
            .times(1)
            .returning(|code| Ok(Some(sample(1, code, "https://old.example.com", Some("u1")))));
        repo.expect_find_active_by_id()
            .times(1)
            .returning(|id| Ok(Some(sample(id, "000001", "https://old.example.com", Some("u1")))));
        repo.expect_update_original_url()
            .times(1)
            .returning(|id, url| Ok(sample(id, "000001", url, Some("u1"))));
        let repo = Arc::new(repo);

        let cache: Arc<dyn CacheService> = Arc::new(MemoryCache::new());
        let (tx, _rx) = mpsc::channel(8);
        let redirects = RedirectService::new(repo.clone(), cache.clone(), tx);
        let links = LinkService::new(repo, cache);

        redirects.resolve("000001").await.unwrap();
        links
            .update_url(1, "u1", "https://new.example.com")
            .await
            .unwrap();
        tokio::task::yield_now().await;

        assert_eq!(
            redirects.resolve("000001").await.unwrap(),
            "https://new.example.com"
        );
    }

    #[tokio::test]
    async fn test_resolve_succeeds_when_worker_gone() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code()
            .times(1)
            .returning(|code| Ok(Some(sample(4, code, "https://example.com", None))));

        let (service, rx) = service(repo, Arc::new(NullCache::new()), 8);
        drop(rx);

        assert_eq!(service.resolve("000004").await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_propagates_storage_error() {
        let mut repo = MockShortUrlRepository::new();
        repo.expect_find_active_by_code()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let (service, mut rx) = service(repo, Arc::new(NullCache::new()), 8);

        let result = service.resolve("000001").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert!(rx.try_recv().is_err());
    }
}
