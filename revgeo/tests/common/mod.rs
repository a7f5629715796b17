//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use rusqlite::{params, Connection};

use revgeo::sector::{self, Level};
use revgeo::store::schema;
use revgeo::Coordinate;

/// (id, name, country, latitude, longitude)
pub type Row = (i64, &'static str, &'static str, f64, f64);

/// A handful of real towns plus a contrived tie around (10, 20).
pub const PLACES: &[Row] = &[
    (1, "Springfield", "USA", 39.0, -89.6),
    (2, "Decatur", "USA", 39.84, -88.95),
    (3, "Paris", "France", 48.8566, 2.3522),
    (4, "Versailles", "France", 48.8049, 2.1204),
    (7, "East", "EE", 10.0, 20.0625),
    (9, "West", "WW", 10.0, 19.9375),
];

/// Write a plain place database at `path`.
pub fn write_database(path: &Path, content_version: &str, rows: &[Row]) {
    let level = Level::default();
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(schema::CREATE_SCHEMA).unwrap();

    let metadata = [
        (schema::KEY_SCHEMA_VERSION, schema::SCHEMA_VERSION.to_string()),
        (schema::KEY_CONTENT_VERSION, content_version.to_string()),
        (schema::KEY_SECTOR_LEVEL, level.get().to_string()),
    ];
    for (key, value) in &metadata {
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .unwrap();
    }

    for &(id, name, country, lat, lon) in rows {
        let sector = sector::sector_for(&Coordinate::new(lat, lon).unwrap(), level);
        conn.execute(
            "INSERT INTO places (id, name, country, latitude, longitude, sector_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, name, country, lat, lon, i64::from(sector)],
        )
        .unwrap();
    }
}

/// Write a gzip-compressed bundle into `dir` and return its path.
pub fn write_bundle(dir: &Path, content_version: &str, rows: &[Row]) -> PathBuf {
    let plain = dir.join(format!("plain-{}.sqlite", content_version));
    write_database(&plain, content_version, rows);

    let bytes = std::fs::read(&plain).unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&bytes).unwrap();

    let bundle = dir.join(format!("geodata-{}.sqlite.gz", content_version));
    std::fs::write(&bundle, encoder.finish().unwrap()).unwrap();
    std::fs::remove_file(&plain).unwrap();
    bundle
}
