use std::sync::Arc;

use crate::config::Config;
use crate::screening::session::ScreeningStore;
use crate::services::ScreeningBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// External parsing/ranking/analysis/email services. `HttpBackend` in production.
    pub backend: Arc<dyn ScreeningBackend>,
    /// Latest committed screening batch, guarded by generation tickets.
    pub screenings: Arc<ScreeningStore>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn ScreeningBackend>) -> Self {
        Self {
            config,
            backend,
            screenings: Arc::new(ScreeningStore::default()),
        }
    }
}
