use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::draft::DEFAULT_DRAFT_KEY;

/// Session-side settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub autosave_interval_secs: u64,
    pub draft_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 5,
            draft_key: DEFAULT_DRAFT_KEY.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }
}
