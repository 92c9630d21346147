//! This module provides the `ConfigLoader` struct, responsible for loading scheduler
//! configurations from JSON files and strings.

use crate::config::SchedulerConfig;
use crate::types::LazyBeaverError;
use std::fs;
use std::path::Path;

/// `ConfigLoader` reads `SchedulerConfig` values from JSON and validates them.
/// Fields missing from the input take their default values.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a scheduler configuration from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the JSON file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(SchedulerConfig)` if the file is read, parsed and valid.
    /// * `Err(LazyBeaverError::FileError)` if the file cannot be read.
    /// * `Err(LazyBeaverError::ConfigError)` if the content is not a valid configuration.
    pub fn load_config(path: &Path) -> Result<SchedulerConfig, LazyBeaverError> {
        let content = fs::read_to_string(path).map_err(|e| {
            LazyBeaverError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_config_from_string(&content)
    }

    /// Loads a scheduler configuration from JSON text.
    pub fn load_config_from_string(content: &str) -> Result<SchedulerConfig, LazyBeaverError> {
        let config: SchedulerConfig = serde_json::from_str(content)
            .map_err(|e| LazyBeaverError::ConfigError(format!("Invalid configuration: {}", e)))?;
        config.validate()?;

        Ok(config)
    }
}
