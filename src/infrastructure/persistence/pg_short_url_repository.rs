//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::{AppError, is_duplicate_code_violation};

/// PostgreSQL repository for short URL records.
///
/// Code uniqueness among active rows is enforced by the partial unique index
/// `short_urls_code_active_key`. Visit counters are only ever changed with an in-place
/// `visit_count + 1`, never read-modify-write.
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let result = sqlx::query_as::<_, ShortUrl>(
            r#"
            INSERT INTO short_urls (code, original_url, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, original_url, code, visit_count,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(&new_url.code)
        .bind(&new_url.original_url)
        .bind(&new_url.owner_id)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(record) => Ok(record),
            Err(e) if is_duplicate_code_violation(&e) => {
                Err(AppError::DuplicateCode { code: new_url.code })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        let record = sqlx::query_as::<_, ShortUrl>(
            r#"
            SELECT id, owner_id, original_url, code, visit_count,
                   created_at, updated_at, deleted_at
            FROM short_urls
            WHERE code = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<ShortUrl>, AppError> {
        let record = sqlx::query_as::<_, ShortUrl>(
            r#"
            SELECT id, owner_id, original_url, code, visit_count,
                   created_at, updated_at, deleted_at
            FROM short_urls
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn increment_visit_count(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE short_urls SET visit_count = visit_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE short_urls
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_original_url(
        &self,
        id: i64,
        original_url: &str,
    ) -> Result<ShortUrl, AppError> {
        sqlx::query_as::<_, ShortUrl>(
            r#"
            UPDATE short_urls
            SET original_url = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, owner_id, original_url, code, visit_count,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "id": id })))
    }

    async fn list_active_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ShortUrl>, AppError> {
        let records = sqlx::query_as::<_, ShortUrl>(
            r#"
            SELECT id, owner_id, original_url, code, visit_count,
                   created_at, updated_at, deleted_at
            FROM short_urls
            WHERE owner_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn count_active_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM short_urls WHERE owner_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }
}
