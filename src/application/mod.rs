//! Application layer services implementing business logic.
//!
//! Services consume repository traits and the cache abstraction and give HTTP handlers
//! and the admin CLI a small API.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Code allocation and record creation
//! - [`services::redirect_service::RedirectService`] - Code resolution and visit queueing
//! - [`services::link_service::LinkService`] - Owner listing, update and deletion

pub mod services;
