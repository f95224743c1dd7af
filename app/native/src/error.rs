//! Error types for Backdrop.
//!
//! This module provides the top-level error returned by CLI commands. Engine
//! and configuration errors convert into it with `?`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::wallpaper::WallpaperError;

/// Errors that can occur during command execution.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Wallpaper engine failure.
    #[error(transparent)]
    Wallpaper(#[from] WallpaperError),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Cache operation failed.
    #[error("Cache error: {0}")]
    Cache(String),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackdropError {
    /// Returns `true` if the failure came from the caller's input.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        match self {
            Self::InvalidArguments(_) => true,
            Self::Wallpaper(err) => err.is_invalid_input(),
            _ => false,
        }
    }
}
