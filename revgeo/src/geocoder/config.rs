//! Geocoder configuration.

use std::path::{Path, PathBuf};

use crate::config::default_database_path;
use crate::sector::Level;

/// Settings bound to one [`super::ReverseGeocoder`] for its lifetime.
///
/// # Example
///
/// ```
/// use revgeo::geocoder::GeocoderConfig;
/// use revgeo::sector::Level;
///
/// let config = GeocoderConfig::new("/tmp/geodata.sqlite")
///     .with_level(Level::new(12).unwrap());
/// assert_eq!(config.map_dimension(), 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderConfig {
    /// Hilbert recursion level the database was built with
    pub level: Level,
    /// Path of the uncompressed runtime database
    pub database_path: PathBuf,
}

impl GeocoderConfig {
    /// Configuration for a database at `database_path`, at the default level.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            level: Level::default(),
            database_path: database_path.into(),
        }
    }

    /// Set the recursion level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Rows (and columns) of the sector grid.
    pub fn map_dimension(&self) -> u32 {
        self.level.map_dimension()
    }

    /// Database path.
    pub fn database_path(&self) -> &Path {
        &self.database_path
    }
}

impl Default for GeocoderConfig {
    /// Default level bound to the per-user data directory.
    fn default() -> Self {
        Self::new(default_database_path())
    }
}
