//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short URL redirect
//! - `GET  /api/health`  - Health check: DB, cache, visit queue
//! - `/api/urls*`        - Short URL creation and management (rate limited)
//!
//! Health lives under `/api` because `health` is itself a well-formed code.
//!
//! # Middleware
//!
//! - **Tracing** - Request spans with status and latency
//! - **Rate limiting** - Per-IP token bucket on `/api/urls*`
//! - **Path normalization** - Trailing slash trimming

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Token bucket settings for the `/api` rate limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub per_second: u64,
    pub burst_size: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst_size: 100,
        }
    }
}

/// Constructs the application router with all routes and middleware.
///
/// # Errors
///
/// Returns an error if the rate limit settings are zero.
pub fn app_router(state: AppState, rate_limit: RateLimitSettings) -> Result<NormalizePath<Router>> {
    let api_router = api::routes::api_routes()
        .layer(rate_limit::layer(
            rate_limit.per_second,
            rate_limit.burst_size,
        )?)
        .route("/health", get(health_handler));

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
