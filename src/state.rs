//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::application::services::{LinkService, RedirectService, ShortenService};
use crate::config::Config;
use crate::domain::entities::DEFAULT_SEQUENCE_NAME;
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::{PgSequenceRepository, PgShortUrlRepository};

pub type AppShortenService = ShortenService<PgSequenceRepository, PgShortUrlRepository>;
pub type AppRedirectService = RedirectService<PgShortUrlRepository>;
pub type AppLinkService = LinkService<PgShortUrlRepository>;

/// Settings the services need beyond their dependencies.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub base_url: String,
    pub sequence_name: String,
    pub sequence_lock_timeout: Duration,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            sequence_name: DEFAULT_SEQUENCE_NAME.to_string(),
            sequence_lock_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&Config> for StateSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            sequence_name: config.sequence_name.clone(),
            sequence_lock_timeout: config.sequence_lock_timeout(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<AppShortenService>,
    pub redirect_service: Arc<AppRedirectService>,
    pub link_service: Arc<AppLinkService>,
    pub cache: Arc<dyn CacheService>,
    pub visit_sender: mpsc::Sender<VisitEvent>,
    pub pool: Arc<PgPool>,
    pub base_url: String,
}

impl AppState {
    /// Wires the PostgreSQL repositories and services around one pool.
    ///
    /// The receiving side of `visit_sender` must be drained by
    /// [`crate::domain::visit_worker::run_visit_worker`].
    pub fn new(
        pool: Arc<PgPool>,
        cache: Arc<dyn CacheService>,
        visit_sender: mpsc::Sender<VisitEvent>,
        settings: StateSettings,
    ) -> Self {
        let sequence_repository = Arc::new(
            PgSequenceRepository::new(pool.clone())
                .with_lock_timeout(settings.sequence_lock_timeout),
        );
        let short_url_repository = Arc::new(PgShortUrlRepository::new(pool.clone()));

        Self {
            shorten_service: Arc::new(ShortenService::new(
                sequence_repository,
                short_url_repository.clone(),
                settings.sequence_name,
            )),
            redirect_service: Arc::new(RedirectService::new(
                short_url_repository.clone(),
                cache.clone(),
                visit_sender.clone(),
            )),
            link_service: Arc::new(LinkService::new(short_url_repository, cache.clone())),
            cache,
            visit_sender,
            pool,
            base_url: settings.base_url,
        }
    }
}
