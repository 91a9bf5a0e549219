#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod repository;
pub mod transport;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, TransportError};
pub use gateway::{SubmissionGateway, SubmissionsPage};
pub use repository::SchemaRepository;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{ApiRequest, Transport};

/// Builds the HTTP transport described by `config`, ready to share between
/// the schema repository and the submission gateway.
#[cfg(feature = "http")]
pub fn http_transport(config: ClientConfig) -> Result<std::sync::Arc<dyn Transport>, ClientError> {
    Ok(std::sync::Arc::new(HttpTransport::new(config)?))
}
