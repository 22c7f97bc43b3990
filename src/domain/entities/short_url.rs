//! Short URL entity representing one issued code.

use chrono::{DateTime, Utc};

/// A shortened URL record.
///
/// `code` is unique among records whose `deleted_at` is unset. Soft-deleted records stay
/// in storage but are invisible to code lookups.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ShortUrl {
    pub id: i64,
    pub owner_id: Option<String>,
    pub original_url: String,
    pub code: String,
    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ShortUrl {
    /// Returns true if the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if `caller` owns this record.
    ///
    /// Anonymous records (no owner) are owned by nobody.
    pub fn is_owned_by(&self, caller: &str) -> bool {
        self.owner_id.as_deref() == Some(caller)
    }

    /// Builds the public short URL under `base_url`.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.code)
    }
}

/// Input data for inserting a new record.
///
/// The visit counter always starts at zero and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortUrl {
    pub code: String,
    pub original_url: String,
    pub owner_id: Option<String>,
}

#[cfg(test)]
pub(crate) fn sample(id: i64, code: &str, url: &str, owner: Option<&str>) -> ShortUrl {
    let now = Utc::now();
    ShortUrl {
        id,
        owner_id: owner.map(str::to_string),
        original_url: url.to_string(),
        code: code.to_string(),
        visit_count: 0,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}
