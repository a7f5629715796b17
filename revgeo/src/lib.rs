//! revgeo - Offline reverse geocoding
//!
//! Resolves a latitude/longitude pair to a `"City, Country"` string using a
//! pre-built SQLite database of places, without any network access.
//!
//! # Architecture
//!
//! ```text
//! Coordinate ──► sector (Hilbert sector id + neighbours)
//!                   │
//!                   ▼
//!               store (places WHERE sector_id IN (...))
//!                   │
//!                   ▼
//!               geocoder (haversine ranking) ──► "Name, Country"
//! ```
//!
//! The [`provision`] module materializes the runtime database from a bundled
//! (optionally gzip-compressed) snapshot before the first lookup.
//!
//! # Example
//!
//! ```ignore
//! use revgeo::geocoder::{GeocoderConfig, ReverseGeocoder};
//! use revgeo::provision::DatabaseProvisioner;
//!
//! let config = GeocoderConfig::default();
//! let provisioner = DatabaseProvisioner::new("assets/geodata.sqlite.gz", &config.database_path, "2024.1");
//! if provisioner.ensure_database() {
//!     let geocoder = ReverseGeocoder::create(config)?;
//!     println!("{}", geocoder.place_for_lat_lon(48.8566, 2.3522)?);
//! }
//! ```

pub mod config;
pub mod coord;
pub mod geocoder;
pub mod logging;
pub mod provision;
pub mod sector;
pub mod store;

pub use coord::{CoordError, Coordinate};
pub use geocoder::{GeocoderConfig, GeocoderError, ReverseGeocoder, SharedGeocoder};
pub use provision::{ensure_database, DatabaseProvisioner, ProvisionError, ProvisionOutcome};
pub use sector::{Level, SectorId};
pub use store::{Place, PlaceStore, StoreError};

/// Version of the revgeo library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
pub(crate) mod test_support;
