pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::archive::{ArchiveReportService, ArchiveSearch};
use crate::config::ArchiveConfig;
use crate::state::DocumentStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub reports: Arc<ArchiveReportService>,
    pub search: Arc<ArchiveSearch>,
    pub archive_config: Arc<ArchiveConfig>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: ArchiveConfig) -> Self {
        Self {
            reports: Arc::new(ArchiveReportService::new(store.clone(), config.clone())),
            search: Arc::new(ArchiveSearch::new(store.clone(), config.clone())),
            archive_config: Arc::new(config),
            store,
            started_at: Instant::now(),
        }
    }
}
