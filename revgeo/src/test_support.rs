//! Fixture databases for unit tests.

use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use rusqlite::{params, Connection};

use crate::coord::Coordinate;
use crate::sector::{self, Level};
use crate::store::schema;

/// A place row to seed into a fixture database.
pub(crate) struct FixturePlace {
    pub id: i64,
    pub name: &'static str,
    pub country: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl FixturePlace {
    pub fn new(
        id: i64,
        name: &'static str,
        country: &'static str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id,
            name,
            country,
            latitude,
            longitude,
        }
    }
}

/// Create a schema-1 database with sectors computed at the default level.
pub(crate) fn build_database(path: &Path, content_version: &str, places: &[FixturePlace]) {
    let level = Level::default();
    let schema_text = schema::SCHEMA_VERSION.to_string();
    let level_text = level.get().to_string();
    let conn = raw_database(
        path,
        &[
            (schema::KEY_SCHEMA_VERSION, schema_text.as_str()),
            (schema::KEY_CONTENT_VERSION, content_version),
            (schema::KEY_SECTOR_LEVEL, level_text.as_str()),
        ],
    );

    for place in places {
        let coord = Coordinate::new(place.latitude, place.longitude).unwrap();
        let sector = sector::sector_for(&coord, level);
        conn.execute(
            "INSERT INTO places (id, name, country, latitude, longitude, sector_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                place.id,
                place.name,
                place.country,
                place.latitude,
                place.longitude,
                i64::from(sector)
            ],
        )
        .unwrap();
    }
}

/// Create the tables and seed arbitrary metadata rows.
pub(crate) fn raw_database(path: &Path, metadata: &[(&str, &str)]) -> Connection {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(schema::CREATE_SCHEMA).unwrap();
    for (key, value) in metadata {
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .unwrap();
    }
    conn
}

/// Gzip `source` into `dest`.
pub(crate) fn gzip_file(source: &Path, dest: &Path) {
    let bytes = std::fs::read(source).unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&bytes).unwrap();
    std::fs::write(dest, encoder.finish().unwrap()).unwrap();
}
