//! Engine configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the engine keeps datasets and finds plugins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory datasets are persisted under
    pub data_dir: PathBuf,

    /// Optional plugin manifest file
    #[serde(default)]
    pub plugin_manifest: Option<PathBuf>,
}

impl EngineConfig {
    /// Configuration rooted at a data directory, without plugins
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            plugin_manifest: None,
        }
    }

    /// Read configuration from `DATAPREP_DATA_DIR` and
    /// `DATAPREP_PLUGIN_MANIFEST`, defaulting the data directory to `./data`
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var_os("DATAPREP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            plugin_manifest: std::env::var_os("DATAPREP_PLUGIN_MANIFEST").map(PathBuf::from),
        }
    }
}
