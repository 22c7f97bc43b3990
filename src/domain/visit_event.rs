//! Visit event model for asynchronous visit counting.

/// A resolved redirect waiting to be counted.
///
/// Sent by the redirect path through a bounded channel and consumed by
/// [`crate::domain::visit_worker::run_visit_worker`], so the HTTP response never waits
/// on the counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEvent {
    pub short_url_id: i64,
    pub code: String,
}

impl VisitEvent {
    pub fn new(short_url_id: i64, code: impl Into<String>) -> Self {
        Self {
            short_url_id,
            code: code.into(),
        }
    }
}
