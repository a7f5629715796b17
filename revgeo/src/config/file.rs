//! Loading and saving config.ini.
//!
//! Loads and saves configuration with sensible defaults, and turns it into
//! the objects the rest of the crate consumes.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::defaults::{config_directory, DEFAULT_CONFIG_FILE};
use super::settings::ConfigFile;
use crate::geocoder::GeocoderConfig;
use crate::provision::DatabaseProvisioner;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Geocoder settings from `[database]` and `[index]`.
    pub fn geocoder_config(&self) -> GeocoderConfig {
        GeocoderConfig::new(&self.database.path).with_level(self.index.level)
    }

    /// Provisioner for the configured bundle.
    ///
    /// `None` unless both `bundled_path` and `content_version` are set.
    pub fn provisioner(&self) -> Option<DatabaseProvisioner> {
        let source = self.database.bundled_path.as_ref()?;
        let version = self.database.content_version.as_ref()?;
        Some(DatabaseProvisioner::new(
            source,
            &self.database.path,
            version.as_str(),
        ))
    }
}

/// Get the path to the config file.
pub fn config_file_path() -> PathBuf {
    config_directory().join(DEFAULT_CONFIG_FILE)
}
