use std::sync::Arc;

use form_client::{ClientError, SubmissionGateway};
use form_spec::{
    AnswerSet, DynamicOptionsCache, FieldKind, FieldSpec, FormCatalog, FormSchema,
    OptionRequest, ValidationReport, VisibilityMask, evaluate, is_visible, validate,
};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::draft::{Draft, DraftError, DraftSlot};
use crate::error::SessionError;

/// Lifecycle of the single form instance a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unselected,
    Editing,
    Submitting,
}

/// Owns the answers of one form and keeps everything derived from them in step.
///
/// Every edit goes through [`FormSession::set_answer`], which recomputes the
/// visibility mask, plans dependent option fetches and publishes a draft
/// snapshot. Fetching and persisting happen elsewhere; the session only
/// hands out [`OptionRequest`]s and snapshot updates.
pub struct FormSession {
    catalog: Arc<FormCatalog>,
    schema: Option<FormSchema>,
    state: SessionState,
    answers: AnswerSet,
    mask: VisibilityMask,
    options: DynamicOptionsCache,
    pending: Vec<OptionRequest>,
    snapshots: watch::Sender<Option<Draft>>,
}

impl FormSession {
    pub fn new(catalog: Arc<FormCatalog>) -> Self {
        let (snapshots, _) = watch::channel(None);
        Self {
            catalog,
            schema: None,
            state: SessionState::Unselected,
            answers: AnswerSet::new(),
            mask: VisibilityMask::new(),
            options: DynamicOptionsCache::new(),
            pending: Vec::new(),
            snapshots,
        }
    }

    pub fn catalog(&self) -> &FormCatalog {
        &self.catalog
    }

    pub fn schema(&self) -> Option<&FormSchema> {
        self.schema.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn mask(&self) -> &VisibilityMask {
        &self.mask
    }

    pub fn options(&self) -> &DynamicOptionsCache {
        &self.options
    }

    pub fn is_visible(&self, field_id: &str) -> bool {
        is_visible(&self.mask, field_id)
    }

    /// Options `field` offers right now, dynamic ones first.
    pub fn effective_options<'a>(&'a self, field: &'a FieldSpec) -> &'a [String] {
        self.options.effective(field)
    }

    /// Receives a draft snapshot after every change; `None` once submitted.
    pub fn subscribe(&self) -> watch::Receiver<Option<Draft>> {
        self.snapshots.subscribe()
    }

    /// Starts a fresh application for `form_id`.
    pub fn select_schema(&mut self, form_id: &str) -> Result<(), SessionError> {
        if self.state == SessionState::Submitting {
            return Err(SessionError::SubmissionInFlight);
        }
        let schema = self
            .catalog
            .get(form_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownForm(form_id.to_string()))?;

        self.answers.clear();
        self.options.clear();
        self.pending.clear();
        self.mask = evaluate(&schema, &self.answers);
        self.schema = Some(schema);
        self.state = SessionState::Editing;
        debug!(form_id, "form selected");
        self.publish();
        Ok(())
    }

    /// Records one edit.
    ///
    /// Checkbox fields toggle `value` in their choice set; every other field
    /// kind replaces its answer.
    pub fn set_answer(&mut self, field_id: &str, value: impl Into<String>) -> Result<(), SessionError> {
        let schema = self.schema.as_ref().ok_or(SessionError::NoFormSelected)?;
        let field = schema
            .leaves()
            .find(|field| field.id == field_id)
            .ok_or_else(|| SessionError::UnknownField {
                form_id: schema.form_id.clone(),
                field_id: field_id.to_string(),
            })?;

        let value = value.into();
        if field.kind == FieldKind::Checkbox {
            self.answers.toggle_choice(field_id, &value);
        } else {
            self.answers.insert(field_id, value);
        }

        self.mask = evaluate(schema, &self.answers);
        let requests = self.options.requests_for(schema, field_id, &self.answers);
        self.pending.extend(requests);
        self.publish();
        Ok(())
    }

    /// Drains the option fetches planned since the last call.
    pub fn take_option_requests(&mut self) -> Vec<OptionRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Applies the outcome of a dependent option fetch.
    ///
    /// Superseded responses are dropped and failures keep whatever options
    /// the field already had. Returns whether the cache changed.
    pub fn apply_options(
        &mut self,
        request: &OptionRequest,
        outcome: Result<Vec<String>, ClientError>,
    ) -> bool {
        match outcome {
            Ok(options) => self.options.complete(request, options),
            Err(err) => {
                warn!(
                    field_id = %request.field_id,
                    value = %request.value,
                    error = %err,
                    "dependent options unavailable, keeping previous list"
                );
                self.options.fail(request);
                false
            }
        }
    }

    /// Resumes a saved application.
    ///
    /// Reselects the draft's form, merges its answers and plans option
    /// fetches for every dynamic field whose dependency is already answered.
    /// A draft for a form that is no longer served is ignored.
    pub fn restore(&mut self, draft: Draft) -> Result<(), SessionError> {
        self.select_schema(&draft.form_id)?;
        self.answers.merge(draft.answers);

        let Some(schema) = self.schema.as_ref() else {
            return Err(SessionError::NoFormSelected);
        };
        self.mask = evaluate(schema, &self.answers);
        let sources: Vec<String> = schema
            .leaves()
            .filter_map(|field| field.options_source().map(str::to_string))
            .collect();
        for source in sources {
            let requests = self.options.requests_for(schema, &source, &self.answers);
            self.pending.extend(requests);
        }
        self.publish();
        Ok(())
    }

    /// Restores the stored draft, if any. Never fails; unusable drafts are logged.
    pub async fn load_draft(&mut self, slot: &DraftSlot) -> bool {
        let Some(draft) = slot.load().await else {
            return false;
        };
        let form_id = draft.form_id.clone();
        match self.restore(draft) {
            Ok(()) => {
                info!(form_id = %form_id, answers = self.answers.len(), "draft restored");
                true
            }
            Err(err) => {
                warn!(form_id = %form_id, error = %err, "ignoring draft");
                false
            }
        }
    }

    /// Snapshot of the current answers, or `None` before a form is chosen.
    pub fn draft(&self) -> Option<Draft> {
        let schema = self.schema.as_ref()?;
        Some(Draft::new(schema.form_id.clone(), self.answers.clone()))
    }

    /// Writes the current answers immediately, even when there are none.
    pub async fn save_draft(&self, slot: &DraftSlot) -> Result<(), DraftError> {
        match self.draft() {
            Some(draft) => slot.save(&draft).await,
            None => Ok(()),
        }
    }

    pub fn validate(&self) -> Result<ValidationReport, SessionError> {
        let schema = self.schema.as_ref().ok_or(SessionError::NoFormSelected)?;
        Ok(validate(schema, &self.answers, &self.options))
    }

    /// Validates and moves to `Submitting`, returning the answers to send.
    pub fn begin_submit(&mut self) -> Result<AnswerSet, SessionError> {
        match self.state {
            SessionState::Unselected => return Err(SessionError::NoFormSelected),
            SessionState::Submitting => return Err(SessionError::SubmissionInFlight),
            SessionState::Editing => {}
        }
        let report = self.validate()?;
        if !report.valid {
            debug!(
                missing = report.missing_required.len(),
                issues = report.issues.len(),
                "submission blocked by validation"
            );
            return Err(SessionError::Validation(report));
        }
        self.state = SessionState::Submitting;
        Ok(self.answers.clone())
    }

    /// Settles a submission started with [`FormSession::begin_submit`].
    ///
    /// Success resets the session and withdraws the draft snapshot; failure
    /// returns to editing with answers untouched.
    pub fn finish_submit(
        &mut self,
        outcome: Result<Value, ClientError>,
    ) -> Result<Value, SessionError> {
        match outcome {
            Ok(receipt) => {
                self.schema = None;
                self.answers.clear();
                self.options.clear();
                self.pending.clear();
                self.mask.clear();
                self.state = SessionState::Unselected;
                self.snapshots.send_replace(None);
                Ok(receipt)
            }
            Err(err) => {
                self.state = SessionState::Editing;
                Err(SessionError::Submission(err))
            }
        }
    }

    /// Sends the answers and clears the stored draft once the endpoint accepts them.
    pub async fn submit(
        &mut self,
        gateway: &SubmissionGateway,
        slot: &DraftSlot,
    ) -> Result<Value, SessionError> {
        let answers = self.begin_submit()?;
        let outcome = gateway.submit(&answers).await;
        let receipt = self.finish_submit(outcome)?;
        if let Err(err) = slot.clear().await {
            warn!(error = %err, "submitted, but the draft could not be removed");
        }
        Ok(receipt)
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.draft());
    }
}
