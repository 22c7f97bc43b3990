//! Helpers for request handling.
//!
//! - [`owner`] - Caller identity extraction from HTTP headers

pub mod owner;
