//! Materializing the runtime place database.
//!
//! The application ships a read-only snapshot of the database (usually
//! gzip-compressed). Before the first lookup, [`DatabaseProvisioner`] makes
//! sure an uncompressed copy of the expected version exists at a writable
//! path:
//!
//! 1. If the target exists and its `content_version` matches, nothing is
//!    written.
//! 2. Otherwise the snapshot is decompressed into a temporary file next to
//!    the target, validated, and renamed over the target.
//!
//! The rename is atomic on the same filesystem, so readers and concurrent
//! provisioners only ever see the old file or a complete new one. Two racing
//! processes each write their own temporary file; the last rename wins and
//! both results are identical.
//!
//! # Example
//!
//! ```ignore
//! use revgeo::provision::DatabaseProvisioner;
//!
//! let provisioner = DatabaseProvisioner::new(
//!     "/usr/share/myapp/geodata.sqlite.gz",
//!     "/home/user/.local/share/myapp/geodata.sqlite",
//!     "2024.1",
//! );
//! if !provisioner.ensure_database() {
//!     // geocoding unavailable for this session
//! }
//! ```

mod snapshot;

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;

use crate::store::{PlaceStore, StoreError};

pub use snapshot::{open_snapshot, SnapshotFormat};

/// Name prefix and suffix of in-progress copies beside the target.
const TEMP_PREFIX: &str = ".revgeo-";
const TEMP_SUFFIX: &str = ".tmp";

/// In-progress copies untouched for this long are left over from a crash.
const STALE_TEMP_AGE: Duration = Duration::from_secs(10 * 60);

/// Error type for provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Bundled database not found at: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to read bundled database {path}: {error}")]
    Read {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("Failed to prepare {path}: {error}")]
    Write {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("Failed to copy {from} into {to}: {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("Existing database at {path} cannot be checked: {error}")]
    TargetUnavailable {
        path: PathBuf,
        #[source]
        error: StoreError,
    },

    #[error("Bundled database is not usable: {0}")]
    InvalidSnapshot(#[source] StoreError),

    #[error("Bundled database has version '{found}', expected '{expected}'")]
    VersionMismatch { expected: String, found: String },

    #[error("Failed to move database into place at {path}: {error}")]
    Persist {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// What [`DatabaseProvisioner::provision`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Target already held the expected version; nothing written.
    AlreadyCurrent,
    /// Target was absent and has been created.
    Installed,
    /// Target was stale or unreadable and has been replaced.
    Replaced {
        /// Version found in the old file, if it could be read
        previous: Option<String>,
    },
}

impl ProvisionOutcome {
    /// Whether the target file was (re)written.
    pub fn wrote_database(&self) -> bool {
        !matches!(self, ProvisionOutcome::AlreadyCurrent)
    }
}

/// Ensures a current database exists at a writable location.
#[derive(Debug, Clone)]
pub struct DatabaseProvisioner {
    source: PathBuf,
    target: PathBuf,
    expected_version: String,
}

impl DatabaseProvisioner {
    /// Create a provisioner.
    ///
    /// # Arguments
    ///
    /// * `source` - Bundled snapshot, plain or gzip-compressed
    /// * `target` - Writable path of the runtime database
    /// * `expected_version` - `content_version` the bundle is known to carry
    pub fn new(
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        expected_version: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            expected_version: expected_version.into(),
        }
    }

    /// Bundled snapshot path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Runtime database path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Version the target must carry.
    pub fn expected_version(&self) -> &str {
        &self.expected_version
    }

    /// Make the target current, reporting what was done.
    ///
    /// On error the previous target (if any) is left untouched.
    pub fn provision(&self) -> Result<ProvisionOutcome, ProvisionError> {
        let outcome = if self.target.exists() {
            match PlaceStore::open(&self.target) {
                Ok(store) if store.content_version() == self.expected_version => {
                    tracing::debug!(
                        path = %self.target.display(),
                        version = %self.expected_version,
                        "Place database is current"
                    );
                    return Ok(ProvisionOutcome::AlreadyCurrent);
                }
                Ok(store) => ProvisionOutcome::Replaced {
                    previous: Some(store.content_version().to_string()),
                },
                Err(
                    e @ (StoreError::Corrupt(_)
                    | StoreError::SchemaMismatch { .. }
                    | StoreError::MissingMetadata(_)
                    | StoreError::InvalidMetadata { .. }),
                ) => {
                    tracing::warn!(
                        path = %self.target.display(),
                        error = %e,
                        "Existing place database is unreadable, replacing it"
                    );
                    ProvisionOutcome::Replaced { previous: None }
                }
                // Busy, locked or I/O failures say nothing about the file itself
                Err(error) => {
                    return Err(ProvisionError::TargetUnavailable {
                        path: self.target.clone(),
                        error,
                    });
                }
            }
        } else {
            ProvisionOutcome::Installed
        };

        let temp = self.materialize()?;
        self.validate(temp.path())?;

        temp.persist(&self.target)
            .map_err(|e| ProvisionError::Persist {
                path: self.target.clone(),
                error: e.error,
            })?;

        tracing::info!(
            path = %self.target.display(),
            version = %self.expected_version,
            ?outcome,
            "Provisioned place database"
        );

        Ok(outcome)
    }

    /// Boolean form of [`provision`](Self::provision).
    ///
    /// Returns `false` if the database could not be materialized; callers
    /// should treat that as "geocoding unavailable" rather than retry in a
    /// loop. Idempotent.
    pub fn ensure_database(&self) -> bool {
        match self.provision() {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    source = %self.source.display(),
                    target = %self.target.display(),
                    error = %e,
                    "Failed to provision place database"
                );
                false
            }
        }
    }

    /// Decompress the snapshot into a temporary file beside the target.
    fn materialize(&self) -> Result<NamedTempFile, ProvisionError> {
        let directory = match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory).map_err(|error| ProvisionError::Write {
            path: directory.clone(),
            error,
        })?;

        sweep_stale_temp_files(&directory, STALE_TEMP_AGE);

        let (_, mut reader) = open_snapshot(&self.source).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                ProvisionError::SourceNotFound(self.source.clone())
            } else {
                ProvisionError::Read {
                    path: self.source.clone(),
                    error,
                }
            }
        })?;

        // Same directory as the target so the final rename stays on one filesystem
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&directory)
            .map_err(|error| ProvisionError::Write {
                path: directory.clone(),
                error,
            })?;

        let temp_path = temp.path().to_path_buf();
        let copy_error = |error| ProvisionError::Copy {
            from: self.source.clone(),
            to: temp_path.clone(),
            error,
        };
        let bytes = io::copy(&mut reader, temp.as_file_mut()).map_err(copy_error)?;
        temp.as_file().sync_all().map_err(copy_error)?;

        tracing::debug!(bytes, path = %temp_path.display(), "Decompressed database snapshot");

        Ok(temp)
    }

    /// Check the decompressed file before it replaces anything.
    fn validate(&self, path: &Path) -> Result<(), ProvisionError> {
        let store = PlaceStore::open(path).map_err(ProvisionError::InvalidSnapshot)?;
        if store.content_version() != self.expected_version {
            return Err(ProvisionError::VersionMismatch {
                expected: self.expected_version.clone(),
                found: store.content_version().to_string(),
            });
        }
        Ok(())
    }
}

/// Remove in-progress copies older than `max_age` from `directory`.
///
/// Younger files may belong to a concurrent provisioner and are kept.
fn sweep_stale_temp_files(directory: &Path, max_age: Duration) {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %directory.display(), error = %e, "Cannot scan for stale copies");
            return;
        }
    };

    let now = SystemTime::now();
    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(TEMP_PREFIX) || !name.ends_with(TEMP_SUFFIX) {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if !matches!(age, Some(age) if age >= max_age) {
            continue;
        }

        let path = entry.path();
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::info!(path = %path.display(), "Removed stale database copy"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale database copy")
            }
        }
    }
}

/// Provision `target` from `source` if it is missing or not at `expected_version`.
///
/// See [`DatabaseProvisioner::ensure_database`].
pub fn ensure_database(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    expected_version: &str,
) -> bool {
    DatabaseProvisioner::new(source.as_ref(), target.as_ref(), expected_version).ensure_database()
}
