//! Persisted database layout.
//!
//! The place database is built offline; this module is the contract between
//! that build and the reader. Bump [`SCHEMA_VERSION`] whenever a column or
//! table used by [`super::PlaceStore`] changes.

use rusqlite::{Connection, ErrorCode, OptionalExtension};

use super::StoreError;

/// Schema version this crate reads.
pub const SCHEMA_VERSION: u32 = 1;

/// Metadata keys.
pub const KEY_SCHEMA_VERSION: &str = "schema_version";
pub const KEY_CONTENT_VERSION: &str = "content_version";
pub const KEY_SECTOR_LEVEL: &str = "sector_level";

/// DDL for a version 1 database.
pub const CREATE_SCHEMA: &str = "
CREATE TABLE metadata (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
CREATE TABLE places (
    id        INTEGER PRIMARY KEY,
    name      TEXT NOT NULL,
    country   TEXT NOT NULL,
    latitude  REAL NOT NULL,
    longitude REAL NOT NULL,
    sector_id INTEGER NOT NULL
);
CREATE INDEX places_sector_idx ON places (sector_id);
";

/// Column list shared by the layout check and the candidate query.
pub(super) const PLACE_COLUMNS: &str = "id, name, country, latitude, longitude, sector_id";

/// Versions and build parameters recorded in the `metadata` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    /// Layout version of the file
    pub schema_version: u32,
    /// Version of the place data (e.g. "2024.1")
    pub content_version: String,
    /// Hilbert level used for `sector_id`, when recorded
    pub sector_level: Option<u8>,
}

/// Read and validate the metadata of an open database.
///
/// Fails with [`StoreError::SchemaMismatch`] when the schema marker is absent
/// or differs from [`SCHEMA_VERSION`], or when the `places` table lacks the
/// expected columns.
pub(crate) fn read_info(conn: &Connection) -> Result<DatabaseInfo, StoreError> {
    let raw_schema = read_value(conn, KEY_SCHEMA_VERSION)?;
    let schema_version = raw_schema
        .as_deref()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v == SCHEMA_VERSION)
        .ok_or_else(|| StoreError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            found: raw_schema.clone(),
        })?;

    // Compiling the statement checks every column without reading rows
    conn.prepare(&format!("SELECT {PLACE_COLUMNS} FROM places LIMIT 0"))
        .map_err(|e| {
            if is_missing_object(&e) {
                StoreError::SchemaMismatch {
                    expected: SCHEMA_VERSION,
                    found: raw_schema.clone(),
                }
            } else {
                StoreError::from(e)
            }
        })?;

    let content_version = read_value(conn, KEY_CONTENT_VERSION)?
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(StoreError::MissingMetadata(KEY_CONTENT_VERSION))?;

    let sector_level = match read_value(conn, KEY_SECTOR_LEVEL)? {
        Some(v) => Some(v.trim().parse::<u8>().map_err(|_| StoreError::InvalidMetadata {
            key: KEY_SECTOR_LEVEL,
            value: v.clone(),
        })?),
        None => None,
    };

    Ok(DatabaseInfo {
        schema_version,
        content_version,
        sector_level,
    })
}

fn read_value(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let result = conn
        .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
            row.get::<_, String>(0)
        })
        .optional();

    match result {
        Ok(value) => Ok(value),
        // A missing metadata table means this is not one of our files
        Err(e) if is_missing_object(&e) => Err(StoreError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            found: None,
        }),
        Err(e) => Err(StoreError::from(e)),
    }
}

/// Whether `e` reports a table or column absent from the file.
///
/// Only these failures say anything about the layout; busy, locked and I/O
/// errors leave the question open.
fn is_missing_object(e: &rusqlite::Error) -> bool {
    if e.sqlite_error_code() != Some(ErrorCode::Unknown) {
        return false;
    }
    let message = e.to_string();
    message.contains("no such table") || message.contains("no such column")
}
