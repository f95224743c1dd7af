//! Errors produced by the wallpaper engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while selecting, deriving, or applying wallpapers.
#[derive(Debug, Error)]
pub enum WallpaperError {
    /// A required external tool is not installed.
    #[error("Application not found: {0}")]
    MissingCapability(String),
    /// An external tool ran but exited unsuccessfully.
    #[error("Command failed: {command} ({status})")]
    ExternalFailure {
        /// The command line that was run.
        command: String,
        /// Exit status description.
        status: String,
    },
    /// The requested wallpaper file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// The requested category directory does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    /// The wallpaper directory does not exist.
    #[error("Wallpaper directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    /// No eligible images under the selection root.
    #[error("No images found in {}", .0.display())]
    NoImages(PathBuf),
    /// No wallpaper has been applied yet and no default is configured.
    #[error("No current wallpaper recorded")]
    NoCurrentWallpaper,
    /// Filesystem error on a cache or state file.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl WallpaperError {
    /// Wraps an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Returns `true` for errors caused by the caller's input rather than the environment.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::CategoryNotFound(_) | Self::DirectoryNotFound(_)
        )
    }
}
