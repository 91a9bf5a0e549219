use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use form_spec::AnswerSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

pub const DEFAULT_DRAFT_KEY: &str = "formData";

/// Locally persisted snapshot of an in-progress application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub form_id: String,
    pub answers: AnswerSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl Draft {
    pub fn new(form_id: impl Into<String>, answers: AnswerSet) -> Self {
        Self {
            form_id: form_id.into(),
            answers,
            saved_at: OffsetDateTime::now_utc().format(&Rfc3339).ok(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft i/o failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored draft is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode draft: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Raw storage for the single draft record.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn read(&self) -> Result<Option<String>, DraftError>;
    async fn write(&self, contents: &str) -> Result<(), DraftError>;
    async fn remove(&self) -> Result<(), DraftError>;
}

/// Stores the draft as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> DraftError {
        DraftError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn read(&self) -> Result<Option<String>, DraftError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    async fn write(&self, contents: &str) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }
        // write-then-rename so a crash never leaves a half-written draft
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, contents)
            .await
            .map_err(|err| self.io_error(err))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|err| self.io_error(err))
    }

    async fn remove(&self) -> Result<(), DraftError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// In-process draft storage, mainly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    contents: Mutex<Option<String>>,
}

impl MemoryDraftStore {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn read(&self) -> Result<Option<String>, DraftError> {
        Ok(self.contents().await)
    }

    async fn write(&self, contents: &str) -> Result<(), DraftError> {
        *self.contents.lock().await = Some(contents.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), DraftError> {
        *self.contents.lock().await = None;
        Ok(())
    }
}

/// Serializes every access to the draft record.
///
/// The autosave task and the session both go through the slot, so a clear
/// issued after a successful submission can never be overtaken by an older
/// snapshot being written.
pub struct DraftSlot {
    store: Arc<dyn DraftStore>,
    lock: Mutex<()>,
}

impl DraftSlot {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Reads the stored draft; a missing, unreadable or corrupt draft is `None`.
    pub async fn load(&self) -> Option<Draft> {
        let _guard = self.lock.lock().await;
        let raw = match self.store.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "draft unreadable, starting empty");
                return None;
            }
        };
        match serde_json::from_str::<Draft>(&raw).map_err(DraftError::Corrupt) {
            Ok(draft) => {
                debug!(form_id = %draft.form_id, answers = draft.answers.len(), "draft loaded");
                Some(draft)
            }
            Err(err) => {
                warn!(error = %err, "discarding corrupt draft");
                None
            }
        }
    }

    pub async fn save(&self, draft: &Draft) -> Result<(), DraftError> {
        let _guard = self.lock.lock().await;
        self.write(draft).await
    }

    pub async fn clear(&self) -> Result<(), DraftError> {
        let _guard = self.lock.lock().await;
        self.store.remove().await
    }

    /// Writes the newest published snapshot, if there is one.
    ///
    /// Returns whether anything was written.
    pub async fn save_latest(
        &self,
        snapshots: &mut watch::Receiver<Option<Draft>>,
    ) -> Result<bool, DraftError> {
        let _guard = self.lock.lock().await;
        let latest = snapshots.borrow_and_update().clone();
        match latest {
            Some(draft) => {
                self.write(&draft).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn write(&self, draft: &Draft) -> Result<(), DraftError> {
        let contents = serde_json::to_string(draft).map_err(DraftError::Encode)?;
        self.store.write(&contents).await
    }
}
