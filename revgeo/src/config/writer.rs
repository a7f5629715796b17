//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let bundled_path = config
        .database
        .bundled_path
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let content_version = config.database.content_version.as_deref().unwrap_or("");

    format!(
        r#"[database]
; Writable location of the uncompressed place database queried at runtime
path = {}
; Bundled snapshot (plain or gzip-compressed) used to (re)create the database.
; Leave empty to manage the database file yourself.
bundled_path = {}
; Version recorded in the bundled snapshot. When the runtime database carries
; a different version it is replaced from the bundle.
content_version = {}

[index]
; Hilbert curve recursion level (1-16, default: 10). Must match the level the
; place database was built with.
level = {}

[logging]
; Directory for log files
directory = {}
; Log file name
file = {}
"#,
        path_to_string(&config.database.path),
        bundled_path,
        content_version,
        config.index.level,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
