//! Environment/runtime helpers
//!
//! Sanity checks on the data file location at startup. The store itself
//! creates missing parent directories on its first save.

use std::path::Path;

use tracing::warn;

/// Warn when `data_file` can never be written as a regular file.
/// Returns false in that case; the roster still starts, but saves will fail.
pub fn check_data_path(data_file: &Path) -> bool {
    if let Ok(meta) = std::fs::metadata(data_file) {
        if !meta.is_file() {
            warn!(path = %data_file.display(), "data path exists but is not a regular file; saves will fail");
            return false;
        }
    }
    match data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => match std::fs::metadata(parent) {
            Ok(meta) if !meta.is_dir() => {
                warn!(path = %parent.display(), "data file parent is not a directory; saves will fail");
                false
            }
            _ => true,
        },
        None => true,
    }
}
