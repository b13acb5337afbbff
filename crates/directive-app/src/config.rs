//! Configuration for the directives binary
//!
//! ```yaml
//! storePath: .directives/store.json
//! logFilter: directive_usecase=debug,info
//! changeLogCapacity: 500
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "directives.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// JSON store file
    pub store_path: PathBuf,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Entries kept by the in-memory change log
    pub change_log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("directives.json"),
            log_filter: "info".to_string(),
            change_log_capacity: 1000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file; a missing file yields defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Builder: replace the store path (`--store`)
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }
}
