//! Shell-like path expansion for configuration values.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
///
/// Surrounding whitespace is ignored and an empty input yields an empty path.
/// Relative paths are returned unchanged.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expands `~` and resolves relative paths against `base_dir`.
///
/// ```ignore
/// let resolved = expand_and_resolve("anime/tree.png", Path::new("/walls"));
/// assert_eq!(resolved, PathBuf::from("/walls/anime/tree.png"));
/// ```
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);

    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}
