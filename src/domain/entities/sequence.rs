//! Named counter entity.

/// A named monotonic counter, the source of uniqueness for codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: String,
    pub value: u64,
}

/// Default counter name shared by every process of a deployment.
pub const DEFAULT_SEQUENCE_NAME: &str = "short_url";
