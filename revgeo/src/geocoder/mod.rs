//! Reverse geocoding: coordinate to `"Name, Country"`.
//!
//! A lookup computes the query's sector, fetches every place stored in that
//! sector and its (up to eight) neighbours, and returns the candidate with
//! the smallest great-circle distance. With no candidates the coordinate
//! itself is returned as `"latitude, longitude"` with six decimals; that is a
//! normal result, not an error.
//!
//! Each [`ReverseGeocoder`] owns its database connection. Calls block on
//! SQLite I/O, so run them off latency-sensitive threads; use
//! [`SharedGeocoder`] to share one instance between threads.
//!
//! # Example
//!
//! ```ignore
//! use revgeo::geocoder::ReverseGeocoder;
//!
//! let geocoder = ReverseGeocoder::open("/path/to/geodata.sqlite")?;
//! assert_eq!(geocoder.place_for_lat_lon(39.0, -89.6)?, "Springfield, USA");
//! ```

mod config;
mod shared;

use std::path::{Path, PathBuf};

use crate::coord::{CoordError, Coordinate};
use crate::sector::{self, Level, SectorError};
use crate::store::{Place, PlaceStore, StoreError};

pub use config::GeocoderConfig;
pub use shared::SharedGeocoder;

/// Error type for geocoder construction and lookups.
#[derive(Debug, thiserror::Error)]
pub enum GeocoderError {
    /// Database file missing, corrupt or unreadable.
    #[error("Place database unavailable: {0}")]
    DatabaseUnavailable(#[source] StoreError),

    /// On-disk schema incompatible with this crate.
    #[error("Place database schema mismatch: {0}")]
    SchemaMismatch(#[source] StoreError),

    /// Database sectors were computed at another recursion level.
    #[error("Place database was built at level {database}, geocoder configured for level {configured}")]
    LevelMismatch { configured: u8, database: u8 },

    #[error("{0}")]
    InvalidCoordinate(#[from] CoordError),

    #[error("Sector computation failed: {0}")]
    Sector(#[from] SectorError),

    /// Database I/O failed during a lookup.
    #[error("Place query failed: {0}")]
    Query(#[source] StoreError),
}

impl GeocoderError {
    fn from_open(error: StoreError) -> Self {
        match error {
            StoreError::SchemaMismatch { .. } => GeocoderError::SchemaMismatch(error),
            other => GeocoderError::DatabaseUnavailable(other),
        }
    }
}

/// Offline reverse geocoder bound to one place database.
#[derive(Debug)]
pub struct ReverseGeocoder {
    config: GeocoderConfig,
    store: PlaceStore,
}

impl ReverseGeocoder {
    /// Open the database named by `config`.
    ///
    /// Fails with [`GeocoderError::DatabaseUnavailable`] or
    /// [`GeocoderError::SchemaMismatch`] when the store cannot be opened.
    pub fn create(config: GeocoderConfig) -> Result<Self, GeocoderError> {
        let store = PlaceStore::open(&config.database_path).map_err(GeocoderError::from_open)?;

        if let Some(database) = store.info().sector_level {
            if database != config.level.get() {
                return Err(GeocoderError::LevelMismatch {
                    configured: config.level.get(),
                    database,
                });
            }
        }

        tracing::info!(
            path = %config.database_path.display(),
            level = config.level.get(),
            content_version = %store.content_version(),
            "Reverse geocoder ready"
        );

        Ok(Self { config, store })
    }

    /// Open a database at the default level.
    pub fn open(database_path: impl Into<PathBuf>) -> Result<Self, GeocoderError> {
        Self::create(GeocoderConfig::new(database_path))
    }

    /// Open the database at the default per-user location.
    ///
    /// Run provisioning first so the file exists.
    pub fn open_default() -> Result<Self, GeocoderError> {
        Self::create(GeocoderConfig::default())
    }

    /// Closest stored place to `coordinate`, if any lies in its sector or a
    /// neighbouring one.
    ///
    /// Ties go to the place with the lowest id.
    pub fn nearest_place(&self, coordinate: &Coordinate) -> Result<Option<Place>, GeocoderError> {
        let level = self.config.level;
        let sector = sector::sector_for(coordinate, level);
        let sectors = sector::neighborhood(sector, level)?;

        let candidates = self
            .store
            .places_in_sectors(&sectors)
            .map_err(GeocoderError::Query)?;

        tracing::trace!(
            %sector,
            sectors = sectors.len(),
            candidates = candidates.len(),
            "Scanned sector neighbourhood"
        );

        Ok(closest(coordinate, candidates))
    }

    /// `"Name, Country"` of the closest place, or `"latitude, longitude"`.
    pub fn place_for(&self, coordinate: &Coordinate) -> Result<String, GeocoderError> {
        match self.nearest_place(coordinate)? {
            Some(place) => Ok(place.to_string()),
            None => {
                tracing::debug!(%coordinate, "No place near coordinate, using fallback");
                Ok(coordinate.to_string())
            }
        }
    }

    /// [`place_for`](Self::place_for) taking raw degrees.
    ///
    /// Fails with [`GeocoderError::InvalidCoordinate`] outside the valid range.
    pub fn place_for_lat_lon(&self, latitude: f64, longitude: f64) -> Result<String, GeocoderError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        self.place_for(&coordinate)
    }

    /// Release the database connection. Later lookups fail with
    /// [`GeocoderError::Query`].
    pub fn close(&mut self) {
        self.store.close();
    }

    /// Configuration this instance was built with.
    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Hilbert recursion level.
    pub fn level(&self) -> Level {
        self.config.level
    }

    /// Rows (and columns) of the sector grid.
    pub fn map_dimension(&self) -> u32 {
        self.config.map_dimension()
    }

    /// Database path.
    pub fn database_path(&self) -> &Path {
        self.store.path()
    }

    /// Schema version of the open database.
    pub fn schema_version(&self) -> u32 {
        self.store.info().schema_version
    }

    /// Content version of the open database.
    pub fn content_version(&self) -> &str {
        self.store.content_version()
    }
}

/// Pick the candidate nearest to `coordinate`; first minimum by id wins.
fn closest(coordinate: &Coordinate, mut candidates: Vec<Place>) -> Option<Place> {
    candidates.sort_by_key(|place| place.id);

    let mut best: Option<(f64, Place)> = None;
    for place in candidates {
        let distance = coordinate.distance_to(place.latitude, place.longitude);
        if !distance.is_finite() {
            continue;
        }
        match &best {
            Some((best_distance, _)) if distance >= *best_distance => {}
            _ => best = Some((distance, place)),
        }
    }

    best.map(|(_, place)| place)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sector::SectorId;
    use crate::test_support::{build_database, FixturePlace};
    use tempfile::TempDir;

    fn geocoder_with(places: &[FixturePlace]) -> (TempDir, ReverseGeocoder) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geodata.sqlite");
        build_database(&path, "2024.1", places);
        let geocoder = ReverseGeocoder::open(&path).unwrap();
        (temp_dir, geocoder)
    }

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn place(id: i64, lat: f64, lon: f64) -> Place {
        Place {
            id,
            name: format!("P{}", id),
            country: "X".to_string(),
            latitude: lat,
            longitude: lon,
            sector_id: SectorId::new(0),
        }
    }

    #[test]
    fn test_exact_match() {
        let (_dir, geocoder) =
            geocoder_with(&[FixturePlace::new(1, "Springfield", "USA", 39.0, -89.6)]);
        assert_eq!(
            geocoder.place_for_lat_lon(39.0, -89.6).unwrap(),
            "Springfield, USA"
        );
    }

    #[test]
    fn test_empty_database_falls_back_to_coordinate() {
        let (_dir, geocoder) = geocoder_with(&[]);
        assert_eq!(
            geocoder.place_for_lat_lon(0.0, 0.0).unwrap(),
            "0.000000, 0.000000"
        );
        assert!(geocoder.nearest_place(&coord(0.0, 0.0)).unwrap().is_none());
    }

    #[test]
    fn test_picks_closest_candidate() {
        let (_dir, geocoder) = geocoder_with(&[
            FixturePlace::new(1, "Far", "AA", 39.1, -89.7),
            FixturePlace::new(2, "Near", "BB", 39.01, -89.61),
        ]);
        assert_eq!(geocoder.place_for(&coord(39.0, -89.6)).unwrap(), "Near, BB");
    }

    #[test]
    fn test_finds_place_in_neighbor_sector() {
        // Cell width at level 10 is 0.3515625° of longitude; 20.0625 lies one
        // column east of the query's cell
        let (_dir, geocoder) = geocoder_with(&[FixturePlace::new(5, "East", "EE", 10.0, 20.0625)]);
        let query = coord(10.0, 20.0);
        let place = geocoder.nearest_place(&query).unwrap().unwrap();
        assert_ne!(
            place.sector_id,
            sector::sector_for(&query, geocoder.level())
        );
        assert_eq!(place.name, "East");
    }

    #[test]
    fn test_place_two_sectors_away_is_not_a_candidate() {
        let (_dir, geocoder) = geocoder_with(&[FixturePlace::new(1, "Distant", "DD", 10.0, 21.0)]);
        assert_eq!(
            geocoder.place_for_lat_lon(10.0, 20.0).unwrap(),
            "10.000000, 20.000000"
        );
    }

    #[test]
    fn test_equidistant_places_resolve_to_lowest_id() {
        let (_dir, geocoder) = geocoder_with(&[
            FixturePlace::new(9, "West", "WW", 10.0, 19.9375),
            FixturePlace::new(7, "East", "EE", 10.0, 20.0625),
        ]);
        for _ in 0..5 {
            assert_eq!(geocoder.place_for_lat_lon(10.0, 20.0).unwrap(), "East, EE");
        }
    }

    #[test]
    fn test_invalid_coordinate_fails_fast() {
        let (_dir, geocoder) = geocoder_with(&[]);
        let result = geocoder.place_for_lat_lon(91.0, 0.0);
        assert!(matches!(result, Err(GeocoderError::InvalidCoordinate(_))));
        let result = geocoder.place_for_lat_lon(0.0, -200.0);
        assert!(matches!(result, Err(GeocoderError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_missing_database_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let result = ReverseGeocoder::open(temp_dir.path().join("missing.sqlite"));
        assert!(matches!(result, Err(GeocoderError::DatabaseUnavailable(_))));
    }

    #[test]
    fn test_schema_mismatch_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("old.sqlite");
        crate::test_support::raw_database(
            &path,
            &[("schema_version", "0"), ("content_version", "2009.1")],
        );

        let result = ReverseGeocoder::open(&path);
        assert!(matches!(result, Err(GeocoderError::SchemaMismatch(_))));
    }

    #[test]
    fn test_level_mismatch_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geodata.sqlite");
        build_database(&path, "2024.1", &[]);

        let config = GeocoderConfig::new(&path).with_level(Level::new(8).unwrap());
        match ReverseGeocoder::create(config) {
            Err(GeocoderError::LevelMismatch {
                configured,
                database,
            }) => {
                assert_eq!(configured, 8);
                assert_eq!(database, 10);
            }
            other => panic!("expected level mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_query_after_close_is_surfaced() {
        let (_dir, mut geocoder) = geocoder_with(&[]);
        geocoder.close();
        let result = geocoder.place_for_lat_lon(0.0, 0.0);
        assert!(matches!(
            result,
            Err(GeocoderError::Query(StoreError::Closed))
        ));
    }

    #[test]
    fn test_introspection() {
        let (dir, geocoder) = geocoder_with(&[]);
        assert_eq!(geocoder.level(), Level::default());
        assert_eq!(geocoder.map_dimension(), 1024);
        assert_eq!(geocoder.schema_version(), 1);
        assert_eq!(geocoder.content_version(), "2024.1");
        assert_eq!(
            geocoder.database_path(),
            dir.path().join("geodata.sqlite").as_path()
        );
        assert_eq!(geocoder.config().level, Level::default());
    }

    #[test]
    fn test_closest_prefers_lower_id_on_tie() {
        let query = coord(0.0, 0.0);
        let winner = closest(&query, vec![place(4, 0.0, 1.0), place(2, 0.0, -1.0)]).unwrap();
        assert_eq!(winner.id, 2);
    }

    #[test]
    fn test_closest_skips_non_finite() {
        let query = coord(0.0, 0.0);
        let winner = closest(&query, vec![place(1, f64::NAN, 0.0), place(2, 1.0, 1.0)]).unwrap();
        assert_eq!(winner.id, 2);
        assert!(closest(&query, Vec::new()).is_none());
    }
}
