use std::sync::Arc;

use dashmap::DashMap;
use form_spec::{FormCatalog, FormSchema, HttpMethod, OptionRequest};
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::transport::{ApiRequest, Transport};

pub const FORMS_PATH: &str = "/forms";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OptionKey {
    endpoint: String,
    method: HttpMethod,
    depends_on: String,
    value: String,
}

impl From<&OptionRequest> for OptionKey {
    fn from(request: &OptionRequest) -> Self {
        Self {
            endpoint: request.endpoint.clone(),
            method: request.method,
            depends_on: request.depends_on.clone(),
            value: request.value.clone(),
        }
    }
}

/// Fetches and caches form schemas and remote option lists.
pub struct SchemaRepository {
    transport: Arc<dyn Transport>,
    catalog: OnceCell<Arc<FormCatalog>>,
    options: DashMap<OptionKey, Vec<String>>,
}

impl SchemaRepository {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            catalog: OnceCell::new(),
            options: DashMap::new(),
        }
    }

    /// Loads the form catalogue once; later calls reuse it.
    ///
    /// A failed load is not cached, so the next call retries. Schemas that
    /// break the engine's invariants are logged and skipped.
    pub async fn catalog(&self) -> Result<Arc<FormCatalog>, ClientError> {
        self.catalog
            .get_or_try_init(|| self.fetch_catalog())
            .await
            .cloned()
    }

    async fn fetch_catalog(&self) -> Result<Arc<FormCatalog>, ClientError> {
        let payload = self
            .transport
            .send(ApiRequest::get(FORMS_PATH))
            .await
            .map_err(ClientError::SchemaFetch)?;
        let forms: Vec<FormSchema> =
            serde_json::from_value(payload).map_err(ClientError::SchemaDecode)?;

        let total = forms.len();
        let forms: Vec<FormSchema> = forms
            .into_iter()
            .filter(|form| match form.check() {
                Ok(()) => true,
                Err(err) => {
                    warn!(form_id = %form.form_id, error = %err, "skipping invalid form schema");
                    false
                }
            })
            .collect();
        info!(loaded = forms.len(), total, "loaded form schemas");
        Ok(Arc::new(FormCatalog::new(forms)))
    }

    /// Fetches the option list for one dependent field.
    ///
    /// GET requests pass the dependency answer as a query parameter named
    /// after the dependency; POST requests send it as a one-key JSON body.
    pub async fn fetch_options(&self, request: &OptionRequest) -> Result<Vec<String>, ClientError> {
        let key = OptionKey::from(request);
        if let Some(cached) = self.options.get(&key) {
            debug!(field_id = %request.field_id, value = %request.value, "option list served from cache");
            return Ok(cached.clone());
        }

        let api_request = match request.method {
            HttpMethod::Get => ApiRequest::get(&request.endpoint)
                .with_query(&request.depends_on, &request.value),
            HttpMethod::Post => {
                let mut body = Map::new();
                body.insert(request.depends_on.clone(), Value::String(request.value.clone()));
                ApiRequest::post(&request.endpoint, Value::Object(body))
            }
        };

        let payload = self
            .transport
            .send(api_request)
            .await
            .map_err(|source| ClientError::OptionFetch {
                field_id: request.field_id.clone(),
                source,
            })?;
        let options = extract_options(&payload).ok_or_else(|| ClientError::OptionShape {
            field_id: request.field_id.clone(),
        })?;

        self.options.insert(key, options.clone());
        Ok(options)
    }
}

/// Picks the option list out of `{ "<resource>": [..] }` or a bare array.
///
/// With several string lists, the first one in document order wins.
fn extract_options(payload: &Value) -> Option<Vec<String>> {
    match payload {
        Value::Array(items) => string_list(items),
        Value::Object(map) => map.values().find_map(|value| match value {
            Value::Array(items) => string_list(items),
            _ => None,
        }),
        _ => None,
    }
}

fn string_list(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}
