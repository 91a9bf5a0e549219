pub mod fill;
pub mod forms;
pub mod schema;
pub mod submissions;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use form_client::{SchemaRepository, SubmissionGateway, http_transport};
use form_engine::{DraftSlot, EngineConfig, FileDraftStore};

/// Collaborators shared by every command.
pub struct AppContext {
    pub repository: Arc<SchemaRepository>,
    pub gateway: Arc<SubmissionGateway>,
    pub drafts: Arc<DraftSlot>,
    pub engine: EngineConfig,
}

impl AppContext {
    pub fn new(config: crate::AppConfig, draft_dir: PathBuf) -> Result<Self> {
        let transport = http_transport(config.client).context("failed to set up the API client")?;
        let store = FileDraftStore::new(&draft_dir, &config.engine.draft_key);
        Ok(Self {
            repository: Arc::new(SchemaRepository::new(Arc::clone(&transport))),
            gateway: Arc::new(SubmissionGateway::new(transport)),
            drafts: Arc::new(DraftSlot::new(Arc::new(store))),
            engine: config.engine,
        })
    }
}
