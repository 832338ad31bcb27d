use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pomstage_util::errors::{StageError, StageResult};

/// Global user configuration loaded from `~/.pomstage/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Resolution settings from `[resolve]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Maven settings file applied to every resolution unless overridden.
    #[serde(default)]
    pub settings: Option<String>,
    /// Force offline mode regardless of the settings file.
    #[serde(default)]
    pub offline: bool,
}

/// Output settings from `[output]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How resolved artifacts are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> StageResult<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and parse a configuration file from an explicit path.
    pub fn from_path(path: &Path) -> StageResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StageError::invalid_config(path.display(), format!("failed to read: {e}"))
        })?;
        let config = toml::from_str(&content).map_err(|e| {
            StageError::invalid_config(path.display(), format!("failed to parse: {e}"))
        })?;
        tracing::debug!("loaded global config from {}", path.display());
        Ok(config)
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the pomstage data directory (`~/.pomstage/`).
pub fn dirs_path() -> PathBuf {
    pomstage_util::fs::home_dir().join(".pomstage")
}
