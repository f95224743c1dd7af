//! Atomic file writes.
//!
//! State and cache files are read by other processes (the automation loop,
//! status bar widgets), so they are replaced with a rename instead of being
//! truncated in place.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Creates a temporary file next to `path` so the final rename stays on one filesystem.
fn sibling_tempfile(path: &Path) -> io::Result<NamedTempFile> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    NamedTempFile::new_in(dir)
}

/// Replaces `path` with `contents`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file cannot be written.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut temp = sibling_tempfile(path)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Copies `source` over `destination`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the destination cannot be written.
pub fn copy_atomic(source: &Path, destination: &Path) -> io::Result<()> {
    let temp = sibling_tempfile(destination)?;
    fs::copy(source, temp.path())?;
    temp.persist(destination).map_err(|err| err.error)?;
    Ok(())
}
