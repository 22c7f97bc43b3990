//! Handlers for owner link management (list, update, delete).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::short_url::{ShortUrlListResponse, ShortUrlResponse, UpdateUrlRequest};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::owner::require_owner;

/// Lists the caller's active short URLs.
///
/// # Endpoint
///
/// `GET /api/urls?page=1&limit=10`
///
/// Requires `X-Owner-Id`. Newest records come first.
///
/// # Errors
///
/// - 400 if pagination parameters are out of range
/// - 401 if the caller is not identified
pub async fn list_urls_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ShortUrlListResponse>, AppError> {
    let owner_id = require_owner(&headers)?;
    let (page, limit) = params
        .validate_and_get_page_limit()
        .map_err(|msg| AppError::bad_request(msg, json!({})))?;

    let page = state
        .link_service
        .list_for_owner(&owner_id, page, limit)
        .await?;

    Ok(Json(ShortUrlListResponse::from_page(page, &state.base_url)))
}

/// Changes the destination of an owned short URL.
///
/// # Endpoint
///
/// `PUT /api/urls/{id}`
///
/// # Errors
///
/// - 400 if the URL is invalid
/// - 401 if the caller is not identified
/// - 403 if the caller does not own the record
/// - 404 if no active record has this id
pub async fn update_url_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let owner_id = require_owner(&headers)?;
    payload.validate()?;

    let record = state
        .link_service
        .update_url(id, &owner_id, &payload.url)
        .await?;

    Ok(Json(ShortUrlResponse::from_record(record, &state.base_url)))
}

/// Soft-deletes an owned short URL.
///
/// # Endpoint
///
/// `DELETE /api/urls/{id}`
///
/// Returns `204 No Content`. The code stops resolving immediately.
///
/// # Errors
///
/// - 401 if the caller is not identified
/// - 403 if the caller does not own the record
/// - 404 if no active record has this id
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let owner_id = require_owner(&headers)?;

    state.link_service.delete(id, &owner_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
