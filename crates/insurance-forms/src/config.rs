use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use form_client::ClientConfig;
use form_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Contents of `config.toml`; every table and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Loads `path`, or the per-user config file when no path is given.
    ///
    /// An explicit path must exist; a missing per-user file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "devotel", "insurance-forms")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Where drafts live unless `--draft-dir` says otherwise.
pub fn default_draft_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".insurance-forms"))
}
