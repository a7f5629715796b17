//! Configuration file handling.
//!
//! The host application can keep geocoder settings in an INI file
//! (`~/.config/revgeo/config.ini` by default):
//!
//! ```ini
//! [database]
//! path = ~/.local/share/revgeo/geodata.sqlite
//! bundled_path = /usr/share/myapp/geodata.sqlite.gz
//! content_version = 2024.1
//!
//! [index]
//! level = 10
//!
//! [logging]
//! directory = ~/.local/share/revgeo/logs
//! file = revgeo.log
//! ```
//!
//! Settings structs live in `settings`, constants in `defaults`,
//! parsing in `parser`, and serialization in `writer`.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    config_directory, data_directory, default_database_path, default_log_directory,
    DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_FILE, DEFAULT_LOG_FILE,
};
pub use file::{config_file_path, ConfigFileError};
pub use settings::{ConfigFile, DatabaseSettings, IndexSettings, LoggingSettings};
