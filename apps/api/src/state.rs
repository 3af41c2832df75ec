use std::sync::Arc;

use crate::catalog::ContentCatalog;
use crate::roadmap::lifecycle::LifecycleManager;
use crate::skills::taxonomy::SkillTaxonomy;
use crate::store::RoadmapStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Default: PgStore; MemoryStore when DATABASE_URL is unset.
    pub store: Arc<dyn RoadmapStore>,
    pub roadmap: LifecycleManager,
    /// Read-only after startup.
    pub taxonomy: Arc<SkillTaxonomy>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RoadmapStore>,
        catalog: Arc<ContentCatalog>,
        taxonomy: Arc<SkillTaxonomy>,
    ) -> Self {
        Self {
            roadmap: LifecycleManager::new(store.clone(), catalog),
            store,
            taxonomy,
        }
    }
}
