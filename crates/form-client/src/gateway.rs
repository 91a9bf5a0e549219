use std::sync::Arc;

use form_spec::AnswerSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::ClientError;
use crate::transport::{ApiRequest, Transport};

pub const SUBMIT_PATH: &str = "/forms/submit";
pub const SUBMISSIONS_PATH: &str = "/forms/submissions";

/// Listing of previously submitted applications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionsPage {
    pub columns: Vec<String>,
    pub data: Vec<Map<String, Value>>,
}

/// Sends finished applications and lists submitted ones.
#[derive(Clone)]
pub struct SubmissionGateway {
    transport: Arc<dyn Transport>,
}

impl SubmissionGateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Posts the flat answer map. Any non-2xx or network failure is an error.
    pub async fn submit(&self, answers: &AnswerSet) -> Result<Value, ClientError> {
        match self
            .transport
            .send(ApiRequest::post(SUBMIT_PATH, answers.to_json()))
            .await
        {
            Ok(receipt) => {
                info!(fields = answers.len(), "application submitted");
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "application submission failed");
                Err(ClientError::Submit(err))
            }
        }
    }

    pub async fn submissions(&self) -> Result<SubmissionsPage, ClientError> {
        let payload = self
            .transport
            .send(ApiRequest::get(SUBMISSIONS_PATH))
            .await
            .map_err(ClientError::SubmissionsFetch)?;
        serde_json::from_value(payload).map_err(ClientError::SubmissionsDecode)
    }
}
