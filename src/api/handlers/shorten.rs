//! Handler for the shortening endpoint.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::short_url::{ShortUrlResponse, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::owner::extract_owner_from_headers;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/urls/shorten`
///
/// # Request
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// The optional `X-Owner-Id` header records the caller as the owner.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "code": "000001",
///   "short_url": "http://localhost:3000/000001",
///   "original_url": "https://example.com",
///   "owner_id": null,
///   "visit_count": 0,
///   "created_at": "2026-01-01T00:00:00Z",
///   "updated_at": "2026-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL is invalid
/// - 503 if no code could be allocated (safe to retry)
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    payload.validate()?;
    let owner_id = extract_owner_from_headers(&headers)?;

    let record = state.shorten_service.shorten(payload.url, owner_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortUrlResponse::from_record(record, &state.base_url)),
    ))
}
