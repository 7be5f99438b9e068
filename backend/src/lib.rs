// Library exports for the server binary, the CLI and tests
pub mod config;
pub mod editor;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::{sync::Arc, time::Duration};

use config::Config;
use services::{
    api_client::BackendClient, builds::ExpoBuildService, editor_sessions::EditorSessions,
    fixtures::FixtureRepository, repository::EventRepository,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<BackendClient>,
    /// Where editors load and save drafts: the event API, or the in-memory
    /// fixtures when `USE_FIXTURES` is set.
    pub repository: Arc<dyn EventRepository>,
    pub editors: Arc<EditorSessions>,
    pub builds: Arc<ExpoBuildService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let backend = Arc::new(BackendClient::new(&config.api_url, &config.api_key));
        let repository: Arc<dyn EventRepository> = if config.use_fixtures {
            Arc::new(FixtureRepository::with_demo_event())
        } else {
            backend.clone()
        };
        Self::with_repository(config, backend, repository)
    }

    pub fn with_repository(
        config: Config,
        backend: Arc<BackendClient>,
        repository: Arc<dyn EventRepository>,
    ) -> Self {
        let idle_timeout = Duration::from_secs(config.editor_idle_timeout_seconds);
        Self {
            builds: Arc::new(ExpoBuildService::new(&config)),
            config: Arc::new(config),
            backend,
            repository,
            editors: Arc::new(EditorSessions::new(idle_timeout)),
        }
    }
}
