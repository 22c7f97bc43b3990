//! API route configuration.

use crate::api::handlers::{
    delete_url_handler, list_urls_handler, shorten_handler, update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Short URL management routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /urls/shorten` - Create a short URL (owner optional)
/// - `GET    /urls`         - List the caller's short URLs (paginated)
/// - `PUT    /urls/{id}`    - Change the destination of an owned short URL
/// - `DELETE /urls/{id}`    - Soft-delete an owned short URL
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler))
        .route("/urls/shorten", post(shorten_handler))
        .route(
            "/urls/{id}",
            put(update_url_handler).delete(delete_url_handler),
        )
}
