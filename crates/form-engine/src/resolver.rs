use std::collections::HashMap;
use std::sync::Arc;

use form_client::{ClientError, SchemaRepository, TransportError};
use form_spec::OptionRequest;
use tokio::task::{Id, JoinSet};
use tracing::{debug, warn};

/// A finished dependent option fetch, tagged with the request that started it.
#[derive(Debug)]
pub struct OptionOutcome {
    pub request: OptionRequest,
    pub result: Result<Vec<String>, ClientError>,
}

/// Runs option fetches concurrently and hands results back in completion order.
///
/// Completion order is not issue order; the session's tag check decides
/// which results still apply. Every dispatched request yields exactly one
/// outcome, including fetches whose task panicked.
pub struct OptionsResolver {
    repository: Arc<SchemaRepository>,
    tasks: JoinSet<Result<Vec<String>, ClientError>>,
    requests: HashMap<Id, OptionRequest>,
}

impl OptionsResolver {
    pub fn new(repository: Arc<SchemaRepository>) -> Self {
        Self {
            repository,
            tasks: JoinSet::new(),
            requests: HashMap::new(),
        }
    }

    pub fn dispatch(&mut self, requests: Vec<OptionRequest>) {
        for request in requests {
            debug!(field_id = %request.field_id, value = %request.value, "fetching dependent options");
            let repository = Arc::clone(&self.repository);
            let task_request = request.clone();
            let handle = self
                .tasks
                .spawn(async move { repository.fetch_options(&task_request).await });
            self.requests.insert(handle.id(), request);
        }
    }

    /// Waits for the next completed fetch; `None` when nothing is in flight.
    pub async fn next(&mut self) -> Option<OptionOutcome> {
        loop {
            let joined = self.tasks.join_next_with_id().await?;
            let id = match &joined {
                Ok((id, _)) => *id,
                Err(err) => err.id(),
            };
            let Some(request) = self.requests.remove(&id) else {
                continue;
            };
            let result = match joined {
                Ok((_, result)) => result,
                Err(err) => {
                    warn!(field_id = %request.field_id, error = %err, "option fetch task failed");
                    Err(ClientError::OptionFetch {
                        field_id: request.field_id.clone(),
                        source: TransportError::Unavailable(format!("fetch task failed: {err}")),
                    })
                }
            };
            return Some(OptionOutcome { request, result });
        }
    }
}
