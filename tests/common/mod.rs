#![allow(dead_code)]

use sqlx::PgPool;
use std::sync::Arc;
use tinylink::domain::visit_event::VisitEvent;
use tinylink::infrastructure::cache::NullCache;
use tinylink::state::{AppState, StateSettings};
use tokio::sync::mpsc;

pub const BASE_URL: &str = "https://tiny.test";

/// Inserts an active record directly and returns its id.
pub async fn create_test_url(pool: &PgPool, code: &str, url: &str, owner: Option<&str>) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO short_urls (code, original_url, owner_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .bind(owner)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts an already soft-deleted record and returns its id.
pub async fn create_deleted_url(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO short_urls (code, original_url, deleted_at) VALUES ($1, $2, NOW()) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Reads the visit counter of a record, deleted or not.
pub async fn visit_count(pool: &PgPool, id: i64) -> i64 {
    sqlx::query_scalar("SELECT visit_count FROM short_urls WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Builds state backed by `pool` with caching disabled.
///
/// Visit events are not drained; tests that care about counters either read the
/// receiver or run the worker themselves.
pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<VisitEvent>) {
    create_test_state_with_capacity(pool, 100)
}

pub fn create_test_state_with_capacity(
    pool: PgPool,
    capacity: usize,
) -> (AppState, mpsc::Receiver<VisitEvent>) {
    let (tx, rx) = mpsc::channel(capacity);

    let settings = StateSettings {
        base_url: BASE_URL.to_string(),
        ..StateSettings::default()
    };

    let state = AppState::new(Arc::new(pool), Arc::new(NullCache), tx, settings);

    (state, rx)
}
