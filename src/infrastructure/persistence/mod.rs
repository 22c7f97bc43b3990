//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgSequenceRepository`] - Row-locked sequence allocation
//! - [`PgShortUrlRepository`] - Short URL storage, lookup and visit counting

pub mod pg_sequence_repository;
pub mod pg_short_url_repository;

pub use pg_sequence_repository::PgSequenceRepository;
pub use pg_short_url_repository::PgShortUrlRepository;
