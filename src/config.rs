use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

pub const DEFAULT_DB_ROOT: &str = "/data/kaijudb";

/// Settings for the `kaiju-params` tool, read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    /// Directory holding one subdirectory per Kaiju database.
    pub db_root: PathBuf,
    /// Run required-parameter checks after decoding.
    pub validate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            db_root: PathBuf::from(DEFAULT_DB_ROOT),
            validate: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    /// Defaults when no file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| anyhow::anyhow!("Unsupported log level: {}", self.log_level))
    }
}
