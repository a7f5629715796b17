//! Default values and locations.
//!
//! Contains the `DEFAULT_*` constants, the per-user directories and the
//! `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::sector::Level;

/// Config file name inside [`config_directory`].
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Runtime database file name inside [`data_directory`].
pub const DEFAULT_DATABASE_FILE: &str = "geodata.sqlite";

/// Log file name.
pub const DEFAULT_LOG_FILE: &str = "revgeo.log";

const APP_DIR: &str = "revgeo";

/// Per-user configuration directory (e.g. `~/.config/revgeo`).
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Per-user data directory (e.g. `~/.local/share/revgeo`).
pub fn data_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Directory for log files (e.g. `~/.local/share/revgeo/logs`).
pub fn default_log_directory() -> PathBuf {
    data_directory().join("logs")
}

/// Writable location of the runtime database.
pub fn default_database_path() -> PathBuf {
    data_directory().join(DEFAULT_DATABASE_FILE)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                path: default_database_path(),
                bundled_path: None,
                content_version: None,
            },
            index: IndexSettings {
                level: Level::default(),
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
