//! DTOs for short URL creation and management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::OwnerPage;
use crate::domain::entities::ShortUrl;

/// Longest destination URL accepted.
pub const MAX_URL_LENGTH: u64 = 2048;

/// Request body for `POST /api/urls/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Destination URL (absolute http or https).
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Request body for `PUT /api/urls/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlRequest {
    /// New destination URL.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// JSON representation of a short URL record.
#[derive(Debug, Serialize)]
pub struct ShortUrlResponse {
    pub id: i64,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub owner_id: Option<String>,
    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortUrlResponse {
    pub fn from_record(record: ShortUrl, base_url: &str) -> Self {
        Self {
            short_url: record.short_url(base_url),
            id: record.id,
            code: record.code,
            original_url: record.original_url,
            owner_id: record.owner_id,
            visit_count: record.visit_count,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Response for `GET /api/urls`.
#[derive(Debug, Serialize)]
pub struct ShortUrlListResponse {
    pub items: Vec<ShortUrlResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl ShortUrlListResponse {
    pub fn from_page(page: OwnerPage, base_url: &str) -> Self {
        Self {
            items: page
                .items
                .into_iter()
                .map(|record| ShortUrlResponse::from_record(record, base_url))
                .collect(),
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::short_url::sample;

    #[test]
    fn test_shorten_request_validation() {
        let ok: ShortenRequest = serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert!(ok.validate().is_ok());

        let bad: ShortenRequest = serde_json::from_str(r#"{"url": "not a url"}"#).unwrap();
        assert!(bad.validate().is_err());

        let empty: ShortenRequest = serde_json::from_str(r#"{"url": ""}"#).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_shorten_request_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH as usize));
        let request = ShortenRequest { url };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_renders_short_url() {
        let record = sample(1, "000001", "https://example.com", Some("u1"));

        let response = ShortUrlResponse::from_record(record, "https://tiny.link/");

        assert_eq!(response.short_url, "https://tiny.link/000001");
        assert_eq!(response.code, "000001");
        assert_eq!(response.owner_id.as_deref(), Some("u1"));
    }
}
