use form_client::ClientError;
use form_spec::ValidationReport;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("form schemas are unavailable: {0}")]
    SchemaUnavailable(#[source] ClientError),
    #[error("no form selected")]
    NoFormSelected,
    #[error("unknown form '{0}'")]
    UnknownForm(String),
    #[error("form '{form_id}' has no answerable field '{field_id}'")]
    UnknownField { form_id: String, field_id: String },
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error(
        "{} field(s) need attention",
        .0.missing_required.len() + .0.issues.len()
    )]
    Validation(ValidationReport),
    #[error("submission failed: {0}")]
    Submission(#[source] ClientError),
}
