//! Configuration schema for Strata
//!
//! Configuration is stored at `~/.config/strata/config.toml`

use crate::loader::{ProbeFilter, DEFAULT_MAX_UNIT_SIZE};
use crate::source::DEFAULT_UNIT_SUFFIX;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Loader behavior
    pub loader: LoaderConfig,

    /// Names never memoized
    pub probe: ProbeFilter,

    /// Sources registered at startup
    pub sources: SourcesConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Suffix of compiled unit files
    pub unit_suffix: String,

    /// Largest unit accepted, in bytes
    pub max_unit_size: u64,

    /// Remember failed unit lookups
    pub negative_cache: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            unit_suffix: DEFAULT_UNIT_SUFFIX.to_string(),
            max_unit_size: DEFAULT_MAX_UNIT_SIZE,
            negative_cache: true,
        }
    }
}

/// Sources registered in order when the loader starts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directory trees of compiled units
    pub directories: Vec<PathBuf>,

    /// Zip archives of compiled units
    pub archives: Vec<PathBuf>,
}

impl Config {
    /// Check values serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.loader.max_unit_size == 0 {
            return Err("loader.max_unit_size must be greater than zero".to_string());
        }
        if self.loader.unit_suffix.is_empty() {
            return Err("loader.unit_suffix must not be empty".to_string());
        }
        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(format!(
                "general.log_format must be \"text\" or \"json\", got {:?}",
                self.general.log_format
            ));
        }
        Ok(())
    }
}
