use std::sync::Arc;

use common::{
    storage::{db::SurrealDbClient, store::StorageManager},
    utils::config::AppConfig,
};
use ingestion_pipeline::IngestionPipeline;

#[derive(Clone)]
pub struct ApiState {
    pub db: Arc<SurrealDbClient>,
    pub config: AppConfig,
    pub storage: StorageManager,
    pub ingestion: Arc<IngestionPipeline>,
}

impl ApiState {
    /// Build a state from already-initialized resources. Used by `main` and
    /// by tests running against in-memory backends.
    pub fn with_resources(
        db: Arc<SurrealDbClient>,
        storage: StorageManager,
        config: AppConfig,
    ) -> Self {
        let ingestion = Arc::new(IngestionPipeline::new(
            db.clone(),
            storage.clone(),
            config.clone(),
        ));

        Self {
            db,
            config,
            storage,
            ingestion,
        }
    }
}
