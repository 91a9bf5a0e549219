use async_trait::async_trait;
use form_spec::HttpMethod;
use serde_json::Value;

use crate::error::TransportError;

/// A single call to the insurance API.
///
/// `target` is either a path relative to the configured base URL or an
/// absolute URL supplied by a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub target: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(target: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            target: target.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(target: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            target: target.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Sends requests and returns the decoded JSON body of a 2xx response.
///
/// An empty success body decodes to `Value::Null`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use form_spec::HttpMethod;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use reqwest::{Client, Method, Url};
    use serde_json::Value;
    use tracing::debug;

    use super::{ApiRequest, Transport};
    use crate::config::ClientConfig;
    use crate::error::TransportError;

    /// `reqwest`-backed transport built from a [`ClientConfig`].
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: Client,
        config: ClientConfig,
    }

    impl HttpTransport {
        pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
            Url::parse(&config.base_url).map_err(|_| TransportError::InvalidUrl {
                url: config.base_url.clone(),
            })?;

            let mut headers = HeaderMap::new();
            for (name, value) in &config.headers {
                let invalid = || TransportError::InvalidHeader { name: name.clone() };
                let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
                let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
                headers.insert(header_name, header_value);
            }

            let client = Client::builder()
                .default_headers(headers)
                .timeout(config.timeout())
                .build()?;
            Ok(Self { client, config })
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
            let url = self.config.resolve(&request.target);
            let mut url = Url::parse(&url).map_err(|_| TransportError::InvalidUrl { url })?;
            if !request.query.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (name, value) in &request.query {
                    pairs.append_pair(name, value);
                }
            }
            let method = match request.method {
                HttpMethod::Get => Method::GET,
                HttpMethod::Post => Method::POST,
            };
            debug!(%method, %url, "sending request");

            let mut builder = self.client.request(method, url.clone());
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let bytes = response.bytes().await?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_slice(&bytes)?)
        }
    }
}
