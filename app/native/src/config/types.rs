//! Configuration types for Backdrop.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{APP_NAME, DEFAULT_REPOSITORY};
use crate::wallpaper::{DEFAULT_AFTER_SET, DEFAULT_RELOADS, EffectKind};

/// External programs used by the engine.
///
/// Each value is a program name looked up on `PATH`, or an absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolsConfig {
    /// Paints the wallpaper. Invoked as `<display> -m fill -i <path>`.
    /// Default: "swaybg"
    pub display: String,

    /// Generates the color palette. Invoked as `<palette> run <path>`.
    /// Default: "wallust"
    pub palette: String,

    /// Produces effect artifacts. Invoked as `<transform> <source> <args...> <output>`.
    /// Default: "magick"
    pub transform: String,

    /// Raises desktop notifications. Skipped when not installed.
    /// Default: "notify-send"
    pub notify: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            display: "swaybg".to_string(),
            palette: "wallust".to_string(),
            transform: "magick".to_string(),
            notify: "notify-send".to_string(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct BackdropConfig {
    /// Directory holding the wallpaper collection. Supports `~`.
    /// Overridden by `BACKDROP_WALLPAPER_DIR`.
    /// Default: "~/Pictures/wallpaper"
    pub wallpaper_dir: String,

    /// Directory for derived artifacts and state files. Supports `~`.
    /// Overridden by `BACKDROP_CACHE_DIR`.
    /// Default: "" (`$XDG_CACHE_HOME/wallpaper`)
    pub cache_dir: String,

    /// Wallpaper used by `restore` and `color` before any wallpaper has been set.
    /// Relative paths are resolved against `wallpaperDir`.
    /// Default: "" (none)
    pub default_wallpaper: String,

    /// External programs.
    pub tools: ToolsConfig,

    /// Commands run, in order, after the palette is regenerated.
    /// A failing reload does not stop the others.
    pub reloads: Vec<String>,

    /// Effects derived from every wallpaper. Either a built-in name
    /// (`"square"`, `"blurred"`) or `{ "name": ..., "args": [...] }`.
    pub effects: Vec<EffectKind>,

    /// Commands run after a wallpaper is set from the command line.
    pub after_set: Vec<String>,

    /// Git repository cloned by `backdrop update`.
    pub repository: String,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            wallpaper_dir: crate::constants::DEFAULT_WALLPAPER_DIR.to_string(),
            cache_dir: String::new(),
            default_wallpaper: String::new(),
            tools: ToolsConfig::default(),
            reloads: DEFAULT_RELOADS.iter().map(ToString::to_string).collect(),
            effects: EffectKind::defaults(),
            after_set: DEFAULT_AFTER_SET.iter().map(ToString::to_string).collect(),
            repository: DEFAULT_REPOSITORY.to_string(),
        }
    }
}

impl BackdropConfig {
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns an error for effect names that are not usable in file names,
    /// duplicate effect names, and blank tool names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = Vec::with_capacity(self.effects.len());
        for effect in &self.effects {
            if !effect.is_valid() {
                return Err(ConfigError::InvalidEffect(effect.name().to_string()));
            }
            if seen.contains(&effect.name()) {
                return Err(ConfigError::DuplicateEffect(effect.name().to_string()));
            }
            seen.push(effect.name());
        }

        let tools = [
            ("display", &self.tools.display),
            ("palette", &self.tools.palette),
            ("transform", &self.tools.transform),
            ("notify", &self.tools.notify),
        ];
        if let Some((name, _)) = tools.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::EmptyTool((*name).to_string()));
        }
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error("No configuration file found. Expected at ~/.config/backdrop/config.jsonc")]
    NotFound,
    /// The configuration file could not be read or written.
    #[error("Failed to access configuration file {}: {source}", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file {}: {source}", path.display())]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// An effect name cannot be used as a file name component.
    #[error("Invalid effect name: {0:?}")]
    InvalidEffect(String),
    /// Two effects share a name.
    #[error("Duplicate effect name: {0}")]
    DuplicateEffect(String),
    /// A tool was configured as an empty string.
    #[error("Tool \"{0}\" must not be empty")]
    EmptyTool(String),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/backdrop/` if the variable is set
/// 2. `~/.config/backdrop/`
/// 3. The platform config directory reported by `dirs`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut push_dir = |dir: PathBuf| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
        push_dir(PathBuf::from(xdg_config).join(APP_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join(APP_NAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join(APP_NAME));
    }

    paths
}

/// Loads and validates the configuration at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config_from_path(path: &Path) -> Result<(BackdropConfig, PathBuf), ConfigError> {
    let file = fs::File::open(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: BackdropConfig = serde_json::from_reader(reader)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    config.validate()?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, and the errors of [`load_config_from_path`] otherwise.
pub fn load_config() -> Result<(BackdropConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.is_file())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}
