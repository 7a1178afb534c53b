//! Generator configuration
//!
//! Looked up in order: an explicit path, `cliweave.toml` in the working
//! directory, `<config dir>/cliweave/config.toml`, then built-in defaults.
//! Command-line flags override whatever was loaded.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::templates::{ComponentStoreConfig, DEFAULT_COMPONENT_EXTENSION};

/// File name looked for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "cliweave.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Root of the component store; searched for when unset
    pub components_dir: Option<PathBuf>,
    pub component_extension: String,
    pub auto_reload: bool,
    pub output_dir: PathBuf,
    pub backup_existing: bool,
    pub executable_extensions: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            components_dir: None,
            component_extension: DEFAULT_COMPONENT_EXTENSION.to_string(),
            auto_reload: true,
            output_dir: PathBuf::from("."),
            backup_existing: true,
            executable_extensions: vec!["sh".to_string()],
        }
    }
}

impl GeneratorConfig {
    /// Parse one config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolve configuration, honouring `explicit` when given
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in Self::search_locations() {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "Using config file");
                return Self::from_file(&candidate);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn search_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join("cliweave").join("config.toml"));
        }
        locations
    }

    /// Configured components directory, or the first default location that exists
    pub fn resolved_components_dir(&self) -> PathBuf {
        if let Some(dir) = &self.components_dir {
            return dir.clone();
        }

        let mut candidates = vec![PathBuf::from("components")];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("cliweave").join("components"));
        }
        let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("components");

        candidates
            .into_iter()
            .find(|dir| dir.is_dir())
            .unwrap_or(bundled)
    }

    /// Store settings derived from this configuration
    pub fn store_config(&self) -> ComponentStoreConfig {
        ComponentStoreConfig::new(self.resolved_components_dir())
            .with_auto_reload(self.auto_reload)
            .with_extension(self.component_extension.clone())
    }
}
