//! Repository trait for the sequence allocator.

use crate::domain::entities::Sequence;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable allocator of strictly increasing integers, keyed by name.
///
/// # Guarantees
///
/// Every value returned by [`next_value`](Self::next_value) for a given name is strictly
/// greater than all values previously returned for that name, across concurrent callers
/// and across processes sharing the same storage. Serialization comes from the storage
/// transaction alone; implementations must not retry internally.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSequenceRepository`] - PostgreSQL row lock
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Allocates the next value for `name`, creating the counter at 1 if absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Allocation`] if the unit of work could not commit. The
    /// counter is left unchanged in that case.
    async fn next_value(&self, name: &str) -> Result<u64, AppError>;

    /// Reads the last allocated value without allocating.
    ///
    /// Returns `Ok(None)` if nothing has been allocated under `name` yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors or if the stored value is negative.
    async fn current(&self, name: &str) -> Result<Option<Sequence>, AppError>;
}
