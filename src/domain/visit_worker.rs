//! Background worker that applies visit increments.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::repositories::ShortUrlRepository;
use crate::domain::visit_event::VisitEvent;

/// Attempts per event after the first failure.
const MAX_RETRIES: usize = 3;

/// Base delay for the exponential backoff between attempts.
const RETRY_BASE_MS: u64 = 10;

/// Drains visit events and increments the matching counters.
///
/// At most `concurrency` increments run at once. Each increment is retried with
/// jittered exponential backoff; an increment that still fails is logged and counted in
/// the `visit_increment_failures_total` metric, since it silently under-counts visits.
///
/// Returns once every sender is dropped and all in-flight increments have finished.
pub async fn run_visit_worker<R>(
    mut rx: mpsc::Receiver<VisitEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: ShortUrlRepository + 'static,
{
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            record_visit(repository.as_ref(), &event).await;
            drop(permit);
        });
    }

    // Wait for in-flight increments before reporting shutdown.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Visit worker stopped");
}

async fn record_visit<R: ShortUrlRepository>(repository: &R, event: &VisitEvent) {
    let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MS)
        .map(jitter)
        .take(MAX_RETRIES);

    match Retry::start(strategy, || {
        repository.increment_visit_count(event.short_url_id)
    })
    .await
    {
        Ok(true) => {
            metrics::counter!("visits_recorded_total").increment(1);
        }
        Ok(false) => {
            debug!(
                short_url_id = event.short_url_id,
                code = %event.code,
                "Visit target no longer exists"
            );
        }
        Err(e) => {
            metrics::counter!("visit_increment_failures_total").increment(1);
            error!(
                error = %e,
                short_url_id = event.short_url_id,
                code = %event.code,
                "Failed to record visit"
            );
        }
    }
}
