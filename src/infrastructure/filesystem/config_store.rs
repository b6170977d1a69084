use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::common::error::MirrorError;
use crate::common::result::MirrorResult;
use crate::domain::entities::mirror_config::MirrorConfig;

/// Reads `MirrorConfig` values from YAML files
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the configuration file. Validation is left to the caller since
    /// command line overrides are applied afterwards.
    pub fn load(&self) -> MirrorResult<MirrorConfig> {
        debug!("Loading configuration from {}", self.path.display());

        let content = fs::read_to_string(&self.path).map_err(|e| {
            MirrorError::config_error_with_source(
                format!("Cannot read configuration file {}", self.path.display()),
                e,
            )
        })?;

        Self::parse(&content).map_err(|e| match e {
            MirrorError::ConfigError { source, .. } => MirrorError::ConfigError {
                message: format!("Invalid configuration file {}", self.path.display()),
                source,
            },
            other => other,
        })
    }

    /// Parse a YAML document; an empty document yields the defaults
    pub fn parse(content: &str) -> MirrorResult<MirrorConfig> {
        if content.trim().is_empty() {
            return Ok(MirrorConfig::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| MirrorError::config_error_with_source("Invalid configuration", e))
    }
}
