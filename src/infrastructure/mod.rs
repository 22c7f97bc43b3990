//! Infrastructure layer: storage and cache backends behind the domain traits.
//!
//! - [`cache`] - Redirect target cache (Redis, or a no-op when Redis is not configured)
//! - [`persistence`] - PostgreSQL sequence and short URL repositories
//!
//! Schema lives in `migrations/` and is applied by [`crate::server::run`] on startup.

pub mod cache;
pub mod persistence;
