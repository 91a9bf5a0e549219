use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://assignment.devotel.io/api/insurance";

/// Connection settings for the insurance API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: BTreeMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves an endpoint against the base URL.
    ///
    /// Absolute URLs are used as-is; relative targets are appended to the
    /// base path rather than replacing it.
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            return target.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            target.trim_start_matches('/')
        )
    }
}
