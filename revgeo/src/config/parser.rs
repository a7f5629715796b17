//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::sector::{Level, MAX_LEVEL, MIN_LEVEL};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [database] section
    if let Some(section) = ini.section(Some("database")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("database", "path", v, "must not be empty"));
            }
            config.database.path = expand_tilde(v);
        }
        if let Some(v) = section.get("bundled_path") {
            let v = v.trim();
            if !v.is_empty() {
                config.database.bundled_path = Some(expand_tilde(v));
            }
        }
        if let Some(v) = section.get("content_version") {
            let v = v.trim();
            if !v.is_empty() {
                config.database.content_version = Some(v.to_string());
            }
        }
    }

    // [index] section
    if let Some(section) = ini.section(Some("index")) {
        if let Some(v) = section.get("level") {
            let reason = format!("must be an integer between {} and {}", MIN_LEVEL, MAX_LEVEL);
            let raw: u8 = v
                .trim()
                .parse()
                .map_err(|_| invalid("index", "level", v, &reason))?;
            config.index.level = Level::new(raw).map_err(|_| invalid("index", "level", v, &reason))?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.is_empty() || v.contains(['/', '\\']) {
                return Err(invalid(
                    "logging",
                    "file",
                    v,
                    "must be a plain file name",
                ));
            }
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
