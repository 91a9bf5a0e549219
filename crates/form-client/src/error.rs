use thiserror::Error;

/// Failures talking to a remote endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid url '{url}'")]
    InvalidUrl { url: String },
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("response is not valid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Failures surfaced by the schema repository and submission gateway.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to load form schemas: {0}")]
    SchemaFetch(#[source] TransportError),
    #[error("form schema payload is malformed: {0}")]
    SchemaDecode(#[source] serde_json::Error),
    #[error("failed to fetch options for '{field_id}': {source}")]
    OptionFetch {
        field_id: String,
        #[source]
        source: TransportError,
    },
    #[error("options response for '{field_id}' carries no option list")]
    OptionShape { field_id: String },
    #[error("failed to load submissions: {0}")]
    SubmissionsFetch(#[source] TransportError),
    #[error("submissions payload is malformed: {0}")]
    SubmissionsDecode(#[source] serde_json::Error),
    #[error("submission failed: {0}")]
    Submit(#[source] TransportError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
