//! Owner-facing management of short URLs.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::application::services::shorten_service::validate_target_url;
use crate::domain::entities::ShortUrl;
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedTarget};

/// One page of an owner's records.
#[derive(Debug, Clone)]
pub struct OwnerPage {
    pub items: Vec<ShortUrl>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

/// Lists, updates and deletes records on behalf of their owner.
///
/// Ownership is a plain equality check against `owner_id`. Anonymous records have no
/// owner and cannot be changed through this service.
pub struct LinkService<R: ShortUrlRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
}

impl<R: ShortUrlRepository> LinkService<R> {
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Returns page `page` (1-based) of the owner's active records, newest first.
    ///
    /// `page` and `limit` are expected to be validated by the caller.
    pub async fn list_for_owner(
        &self,
        owner_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<OwnerPage, AppError> {
        let page = page.max(1);
        let limit = limit.max(1);
        let offset = i64::from(page - 1) * i64::from(limit);

        let items = self
            .repository
            .list_active_by_owner(owner_id, offset, i64::from(limit))
            .await?;
        let total = self.repository.count_active_by_owner(owner_id).await?;
        let total_pages = (total + i64::from(limit) - 1) / i64::from(limit);

        Ok(OwnerPage {
            items,
            page,
            limit,
            total,
            total_pages,
        })
    }

    /// Points an owned record at a new destination.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is not an absolute http(s) URL
    /// - [`AppError::NotFound`] if no active record has this id
    /// - [`AppError::Forbidden`] if `owner_id` does not own the record
    pub async fn update_url(
        &self,
        id: i64,
        owner_id: &str,
        original_url: &str,
    ) -> Result<ShortUrl, AppError> {
        validate_target_url(original_url)?;

        let record = self.owned_record(id, owner_id).await?;
        let updated = self
            .repository
            .update_original_url(record.id, original_url)
            .await?;

        let target = CachedTarget {
            id: updated.id,
            original_url: updated.original_url.clone(),
        };
        let _ = self.cache.set_target(&updated.code, &target, None).await;
        info!(id, code = %updated.code, "Short URL updated");

        Ok(updated)
    }

    /// Soft-deletes an owned record. Its code stops resolving immediately.
    ///
    /// The cache entry is replaced with a tombstone rather than removed, so a concurrent
    /// lookup cannot refill it with the deleted target.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no active record has this id
    /// - [`AppError::Forbidden`] if `owner_id` does not own the record
    pub async fn delete(&self, id: i64, owner_id: &str) -> Result<(), AppError> {
        let record = self.owned_record(id, owner_id).await?;

        if !self.repository.soft_delete(record.id).await? {
            return Err(AppError::not_found(
                "Short URL not found",
                json!({ "id": id }),
            ));
        }

        let _ = self.cache.mark_deleted(&record.code).await;
        info!(id, code = %record.code, "Short URL deleted");

        Ok(())
    }

    async fn owned_record(&self, id: i64, owner_id: &str) -> Result<ShortUrl, AppError> {
        let record = self
            .repository
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "id": id })))?;

        if !record.is_owned_by(owner_id) {
            return Err(AppError::forbidden(
                "You do not own this short URL",
                json!({ "id": id }),
            ));
        }

        Ok(record)
    }
}
