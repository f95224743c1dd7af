//! Locating external executables.

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::env::EXTRA_PATHS;

/// Resolve the absolute path to an executable binary.
///
/// Absolute paths are checked as-is. Otherwise the binary is searched in:
/// 1. Any directory in the `BACKDROP_EXTRA_PATHS` env var (colon-separated).
/// 2. The current process `PATH`.
/// 3. `~/.cargo/bin` and `~/.local/bin`, which are often missing from the
///    `PATH` of compositor-launched sessions.
///
/// # Errors
///
/// Returns a descriptive reason when the binary cannot be found or is not executable.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, String> {
    if binary.is_empty() {
        return Err("Binary name cannot be empty".to_string());
    }

    let candidate = Path::new(binary);
    if candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(format!("Binary at {} is not executable", candidate.display()))
        };
    }

    let mut search_paths = Vec::new();

    if let Ok(extra) = env::var(EXTRA_PATHS) {
        search_paths.extend(extra.split(':').map(PathBuf::from));
    }

    if let Some(path_var) = env::var_os("PATH") {
        search_paths.extend(env::split_paths(&path_var));
    }

    search_paths.extend([PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")]);

    if let Some(home) = dirs::home_dir() {
        search_paths.push(home.join(".cargo/bin"));
        search_paths.push(home.join(".local/bin"));
    }

    for directory in search_paths {
        if directory.as_os_str().is_empty() {
            continue;
        }

        let candidate_path = directory.join(binary);
        if is_executable(&candidate_path) {
            return Ok(candidate_path);
        }
    }

    Err(format!(
        "Unable to locate executable '{binary}' in known search paths"
    ))
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .is_ok_and(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(resolve_binary("").is_err());
    }

    #[test]
    fn test_absolute_executable_is_returned_as_is() {
        assert_eq!(resolve_binary("/bin/sh").unwrap(), Path::new("/bin/sh"));
    }

    #[test]
    fn test_absolute_non_executable_is_rejected() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let err = resolve_binary(temp.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("not executable"));
    }

    #[test]
    fn test_name_is_found_on_search_path() {
        let path = resolve_binary("sh").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("sh"));
    }

    #[test]
    fn test_unknown_name_is_reported() {
        let err = resolve_binary("backdrop-no-such-tool").unwrap_err();
        assert!(err.contains("backdrop-no-such-tool"));
    }
}
