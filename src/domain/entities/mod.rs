//! Core domain entities.
//!
//! Entities are plain data structures. Creation input lives in separate `New*` structs
//! so storage-assigned fields (ids, timestamps, counters) never come from callers.
//!
//! - [`ShortUrl`] - an issued code and its destination
//! - [`Sequence`] - a named monotonic counter

pub mod sequence;
pub mod short_url;

pub use sequence::{DEFAULT_SEQUENCE_NAME, Sequence};
pub use short_url::{NewShortUrl, ShortUrl};
