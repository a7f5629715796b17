//! Read-only access to the place database.
//!
//! [`PlaceStore`] owns the SQLite connection for its whole lifetime. It is
//! opened read-only, validated against [`schema::SCHEMA_VERSION`] on open,
//! and released by [`PlaceStore::close`] or on drop.
//!
//! The connection is `Send` but not `Sync`; share a store across threads
//! only behind a lock (see [`crate::geocoder::SharedGeocoder`]).

mod place;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params_from_iter, Connection, ErrorCode, OpenFlags};

use crate::sector::SectorId;

pub use place::Place;
pub use schema::DatabaseInfo;

/// Error type for place store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Place database not found at: {0}")]
    NotFound(PathBuf),

    #[error("Place database is corrupt or not a SQLite file: {0}")]
    Corrupt(#[source] rusqlite::Error),

    #[error(
        "Incompatible database schema: expected version {expected}, found {}",
        .found.as_deref().unwrap_or("none")
    )]
    SchemaMismatch {
        expected: u32,
        found: Option<String>,
    },

    #[error("Database metadata is missing '{0}'")]
    MissingMetadata(&'static str),

    #[error("Invalid database metadata: {key} = '{value}'")]
    InvalidMetadata { key: &'static str, value: String },

    #[error("Place store is closed")]
    Closed,

    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::NotADatabase) | Some(ErrorCode::DatabaseCorrupt) => {
                StoreError::Corrupt(e)
            }
            _ => StoreError::Sqlite(e),
        }
    }
}

/// Data-access layer over the place database.
#[derive(Debug)]
pub struct PlaceStore {
    path: PathBuf,
    info: DatabaseInfo,
    conn: Option<Connection>,
}

impl PlaceStore {
    /// Open and validate the database at `path`.
    ///
    /// The connection is dropped on every error path, so a failed open never
    /// leaks a handle.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let info = schema::read_info(&conn)?;

        tracing::debug!(
            path = %path.display(),
            schema_version = info.schema_version,
            content_version = %info.content_version,
            "Opened place database"
        );

        Ok(Self {
            path: path.to_path_buf(),
            info,
            conn: Some(conn),
        })
    }

    /// Fetch every place whose sector is in `sectors`, ordered by id.
    ///
    /// Returns an empty vector when nothing matches.
    pub fn places_in_sectors(&self, sectors: &[SectorId]) -> Result<Vec<Place>, StoreError> {
        let conn = self.conn.as_ref().ok_or(StoreError::Closed)?;
        if sectors.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; sectors.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM places WHERE sector_id IN ({}) ORDER BY id",
            schema::PLACE_COLUMNS,
            placeholders
        );

        let mut stmt = conn.prepare_cached(&sql)?;
        let places = stmt
            .query_map(
                params_from_iter(sectors.iter().map(|s| i64::from(*s))),
                Place::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(places)
    }

    /// Release the connection. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                // The connection is dropped regardless; nothing left to retry
                tracing::warn!(path = %self.path.display(), error = %e, "Error closing place database");
            } else {
                tracing::debug!(path = %self.path.display(), "Closed place database");
            }
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Versions recorded in the database.
    pub fn info(&self) -> &DatabaseInfo {
        &self.info
    }

    /// Content version recorded in the database.
    pub fn content_version(&self) -> &str {
        &self.info.content_version
    }
}

impl Drop for PlaceStore {
    fn drop(&mut self) {
        self.close();
    }
}
