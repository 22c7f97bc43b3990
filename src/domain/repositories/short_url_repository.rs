//! Repository trait for short URL records.

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short URL records.
///
/// Lookups with `active` in their name ignore soft-deleted records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_short_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Persists a new record with a zero visit count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if an active record already uses the code.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds the active record for a code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Finds an active record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError>;

    /// Atomically adds one to the visit counter.
    ///
    /// Implemented as a single storage-side increment, so concurrent calls never lose
    /// updates. Returns `Ok(false)` if no record has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_visit_count(&self, id: i64) -> Result<bool, AppError>;

    /// Soft-deletes a record by setting `deleted_at = now()`.
    ///
    /// Returns `Ok(true)` if an active record was deleted, `Ok(false)` if it was not found
    /// or already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Replaces the destination of an active record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active record has this id.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_original_url(&self, id: i64, original_url: &str)
    -> Result<ShortUrl, AppError>;

    /// Lists an owner's active records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_active_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ShortUrl>, AppError>;

    /// Counts an owner's active records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_active_by_owner(&self, owner_id: &str) -> Result<i64, AppError>;
}
