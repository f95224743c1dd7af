//! Cache root maintenance.
//!
//! The cache root holds derived wallpaper images together with the state
//! files, so clearing it also forgets the current wallpaper and the
//! automation record. Callers stop a running loop before clearing so the
//! record never outlives the process it names.

use std::fs;
use std::io;
use std::path::Path;

/// Removes everything under `root` and recreates it empty.
///
/// Returns the approximate number of bytes freed. A missing root is created
/// and reported as zero bytes freed.
///
/// # Errors
///
/// Returns an error if the directory cannot be measured, removed or recreated.
pub fn clear_cache(root: &Path) -> io::Result<u64> {
    let bytes_freed = if root.exists() {
        let size = calculate_dir_size(root)?;
        fs::remove_dir_all(root)?;
        size
    } else {
        0
    };

    fs::create_dir_all(root)?;
    tracing::info!(path = %root.display(), bytes_freed, "cache cleared");
    Ok(bytes_freed)
}

/// Calculates the total size of a directory in bytes.
fn calculate_dir_size(path: &Path) -> io::Result<u64> {
    let mut total = 0u64;

    if path.is_dir() {
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                total += calculate_dir_size(&entry.path())?;
            } else {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
    }

    Ok(total)
}

/// Formats a byte count as a human-readable string like "1.50 MB".
#[must_use]
#[allow(clippy::cast_precision_loss)] // Precision loss is acceptable for human-readable output
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
