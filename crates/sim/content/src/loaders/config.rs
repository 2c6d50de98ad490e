//! Simulation configuration loader.

use std::path::Path;

use sim_core::SimConfig;

use crate::config::ContentConfig;
use crate::loaders::{LoadResult, read_file};

/// Layout of the configuration file: engine settings under `[sim]`, kit
/// tuning under `[content]`. Both tables are optional.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub sim: SimConfig,
    pub content: ContentConfig,
}

/// Loader for configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<ConfigFile> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML at {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<ConfigFile> {
        let config: ConfigFile = toml::from_str(content)?;
        Ok(config)
    }
}
