//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access and are implemented by concrete repositories in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for service tests.
//!
//! # Available Repositories
//!
//! - [`SequenceRepository`] - Monotonic sequence allocation
//! - [`ShortUrlRepository`] - Short URL records, visit counters and soft deletion

pub mod sequence_repository;
pub mod short_url_repository;

pub use sequence_repository::SequenceRepository;
pub use short_url_repository::ShortUrlRepository;

#[cfg(test)]
pub use sequence_repository::MockSequenceRepository;
#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
