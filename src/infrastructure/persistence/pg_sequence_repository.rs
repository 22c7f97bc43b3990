//! PostgreSQL implementation of the sequence allocator.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::entities::Sequence;
use crate::domain::repositories::SequenceRepository;
use crate::error::AppError;

/// Allocates sequence values under an exclusive row lock.
///
/// Each allocation is one transaction:
///
/// 1. `INSERT ... ON CONFLICT DO NOTHING` makes sure the counter row exists (at 0)
/// 2. `SELECT ... FOR UPDATE` locks it, blocking every other allocator for the same name
/// 3. the incremented value is written back
/// 4. the transaction commits, releasing the lock
///
/// Any failure drops the transaction, which rolls it back, so the stored value never
/// advances without a caller receiving it.
pub struct PgSequenceRepository {
    pool: Arc<PgPool>,
    lock_timeout: Option<Duration>,
}

impl PgSequenceRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            lock_timeout: None,
        }
    }

    /// Bounds how long an allocation waits for the counter row lock.
    ///
    /// A zero duration disables the bound.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    async fn allocate(&self, name: &str) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if let Some(timeout) = self.lock_timeout {
            // SET LOCAL takes no bind parameters; the value is a plain integer.
            let statement = format!("SET LOCAL lock_timeout = {}", timeout.as_millis());
            sqlx::query(&statement).execute(&mut *tx).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO sequences (name, value)
            VALUES ($1, 0)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .execute(&mut *tx)
        .await?;

        let current: i64 = sqlx::query_scalar(
            r#"
            SELECT value
            FROM sequences
            WHERE name = $1
            FOR UPDATE
            "#,
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        let next = current + 1;

        let result = sqlx::query("UPDATE sequences SET value = $2 WHERE name = $1")
            .bind(name)
            .bind(next)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;

        Ok(next)
    }
}

#[async_trait]
impl SequenceRepository for PgSequenceRepository {
    async fn next_value(&self, name: &str) -> Result<u64, AppError> {
        let value = self.allocate(name).await.map_err(|e| {
            warn!(error = %e, sequence = name, "Sequence allocation failed");
            AppError::allocation(
                "Failed to allocate sequence value",
                json!({ "sequence": name }),
            )
        })?;

        u64::try_from(value).map_err(|_| {
            AppError::allocation(
                "Sequence value out of range",
                json!({ "sequence": name, "value": value }),
            )
        })
    }

    async fn current(&self, name: &str) -> Result<Option<Sequence>, AppError> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name, value FROM sequences WHERE name = $1")
                .bind(name)
                .fetch_optional(self.pool.as_ref())
                .await?;

        let Some((name, value)) = row else {
            return Ok(None);
        };

        let value = u64::try_from(value).map_err(|_| {
            AppError::internal(
                "Stored sequence value out of range",
                json!({ "sequence": name, "value": value }),
            )
        })?;

        Ok(Some(Sequence { name, value }))
    }
}
