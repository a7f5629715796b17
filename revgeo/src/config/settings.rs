//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::sector::Level;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Database locations and version
    pub database: DatabaseSettings,
    /// Sector index settings
    pub index: IndexSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    /// Writable path of the uncompressed runtime database
    pub path: PathBuf,
    /// Read-only bundled snapshot (plain or gzip) to provision from
    pub bundled_path: Option<PathBuf>,
    /// `content_version` the bundled snapshot carries
    pub content_version: Option<String>,
}

/// Sector index configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSettings {
    /// Hilbert recursion level; must match the database build
    pub level: Level,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
