//! Domain layer containing business entities and logic.
//!
//! Independent of infrastructure and presentation concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`codec`] - Base62 mapping between sequence values and codes
//! - [`visit_event`] - Visit counting event model
//! - [`visit_worker`] - Asynchronous visit counter worker
//!
//! # Visit Counting Flow
//!
//! 1. The redirect service resolves an active record
//! 2. A [`visit_event::VisitEvent`] is sent to a bounded channel
//! 3. [`visit_worker::run_visit_worker`] applies the increment with retry logic
//! 4. The counter is updated atomically via [`repositories::ShortUrlRepository`]

pub mod codec;
pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
