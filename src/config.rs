use anyhow::{Context, Result};
use ofx_definitions::Dataset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::utils::paths::get_config_path;

/// Settings for generated plugin skeletons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Menu grouping hosts file the plugin under
    #[serde(default = "default_grouping")]
    pub grouping: String,

    #[serde(default = "default_version_major")]
    pub version_major: u32,

    #[serde(default)]
    pub version_minor: u32,
}

fn default_grouping() -> String {
    "OFX".to_string()
}

fn default_version_major() -> u32 {
    1
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            grouping: default_grouping(),
            version_major: default_version_major(),
            version_minor: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// External dataset to use instead of the embedded one
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    #[serde(default)]
    pub codegen: CodegenConfig,
}

impl Config {
    /// Load `~/.ofx-mcp/config.toml`, or defaults when it does not exist
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Build the dataset this configuration points at
    pub fn load_dataset(&self) -> Result<Dataset> {
        let dataset = match &self.dataset {
            Some(path) => {
                info!(path = %path.display(), "Loading external OFX dataset");
                Dataset::from_path(path)?
            }
            None => Dataset::embedded()?,
        };

        info!(
            definitions = dataset.len(),
            hosts = dataset.hosts().len(),
            version = %dataset.info().version,
            "OFX dataset ready"
        );
        Ok(dataset)
    }
}
