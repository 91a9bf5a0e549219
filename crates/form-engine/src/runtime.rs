use std::sync::Arc;

use form_client::{SchemaRepository, SubmissionGateway};
use serde_json::Value;
use tracing::debug;

use crate::autosave::Autosave;
use crate::config::EngineConfig;
use crate::draft::{DraftError, DraftSlot};
use crate::error::SessionError;
use crate::resolver::OptionsResolver;
use crate::session::FormSession;

/// A running form session wired to its remote collaborators and draft storage.
///
/// Holds the autosave task for as long as it lives; dropping the runtime or
/// calling [`FormRuntime::shutdown`] stops it on every exit path.
pub struct FormRuntime {
    session: FormSession,
    resolver: OptionsResolver,
    gateway: Arc<SubmissionGateway>,
    drafts: Arc<DraftSlot>,
    autosave: Option<Autosave>,
}

impl FormRuntime {
    /// Loads the form catalogue, restores any stored draft and starts autosaving.
    pub async fn start(
        repository: Arc<SchemaRepository>,
        gateway: Arc<SubmissionGateway>,
        drafts: Arc<DraftSlot>,
        config: &EngineConfig,
    ) -> Result<Self, SessionError> {
        let catalog = repository
            .catalog()
            .await
            .map_err(SessionError::SchemaUnavailable)?;

        let mut session = FormSession::new(catalog);
        session.load_draft(&drafts).await;

        // subscribe after restoring so the restored draft is not rewritten unchanged
        let autosave = Autosave::spawn(
            Arc::clone(&drafts),
            session.subscribe(),
            config.autosave_interval(),
        );

        let mut resolver = OptionsResolver::new(repository);
        resolver.dispatch(session.take_option_requests());

        Ok(Self {
            session,
            resolver,
            gateway,
            drafts,
            autosave: Some(autosave),
        })
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn select_schema(&mut self, form_id: &str) -> Result<(), SessionError> {
        self.session.select_schema(form_id)
    }

    /// Records an edit and starts any dependent option fetches it calls for.
    pub fn set_answer(&mut self, field_id: &str, value: impl Into<String>) -> Result<(), SessionError> {
        self.session.set_answer(field_id, value)?;
        self.resolver.dispatch(self.session.take_option_requests());
        Ok(())
    }

    /// Waits for every in-flight option fetch and applies the results.
    ///
    /// Returns how many responses changed the option cache.
    pub async fn settle_options(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.resolver.next().await {
            if self.session.apply_options(&outcome.request, outcome.result) {
                applied += 1;
            }
        }
        debug!(applied, "dependent options settled");
        applied
    }

    pub async fn save_draft(&self) -> Result<(), DraftError> {
        self.session.save_draft(&self.drafts).await
    }

    pub async fn submit(&mut self) -> Result<Value, SessionError> {
        self.session.submit(&self.gateway, &self.drafts).await
    }

    /// Stops autosaving and waits for a write in progress to land.
    pub async fn shutdown(mut self) {
        if let Some(autosave) = self.autosave.take() {
            autosave.shutdown().await;
        }
    }
}
