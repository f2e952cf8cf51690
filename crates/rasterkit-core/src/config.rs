//! Session configuration.
//!
//! Every field has a default, so a partial JSON object (or none at all) is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DEFAULT_ACCEPTED_MIME_TYPES;
use crate::encode::{ContainerFormat, DEFAULT_FILENAME_PREFIX};
use crate::transform::Resampling;

/// Default export quality, matching the 2D canvas default of 0.92.
pub const DEFAULT_QUALITY: u8 = 92;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// MIME types a selected file may have.
    pub accepted_mime_types: Vec<String>,
    /// Format used when an export does not name one.
    pub default_format: ContainerFormat,
    /// Quality used when an export does not give one (0 to 100).
    pub default_quality: u8,
    /// Filename prefix when the source file name is unknown.
    pub filename_prefix: String,
    /// Use the source file name as the filename prefix when available.
    pub prefix_from_file_name: bool,
    /// Resampling filter for export renders.
    pub resampling: Resampling,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            accepted_mime_types: DEFAULT_ACCEPTED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            default_format: ContainerFormat::Jpeg,
            default_quality: DEFAULT_QUALITY,
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            prefix_from_file_name: false,
            resampling: Resampling::Lanczos3,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accepted_mime_types.is_empty() {
            return Err(ConfigError::Invalid(
                "acceptedMimeTypes must list at least one type".to_string(),
            ));
        }
        if self.default_quality > 100 {
            return Err(ConfigError::Invalid(format!(
                "defaultQuality must be 0-100, got {}",
                self.default_quality
            )));
        }
        Ok(())
    }
}
