//! Configuration module for Backdrop.
//!
//! This module provides configuration types, loading, and resolution of the
//! loaded file into engine settings.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod template;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub use types::{
    BackdropConfig, ConfigError, ToolsConfig, config_paths, load_config as load_config_default,
    load_config_from_path,
};

use crate::constants::{CACHE_DIR_NAME, DEFAULT_WALLPAPER_DIR, env};
use crate::platform::path::{expand, expand_and_resolve};
use crate::wallpaper::{EngineSettings, parse_commands};

/// Global configuration instance, loaded once per process.
static CONFIG: OnceLock<BackdropConfig> = OnceLock::new();

/// Path to the currently loaded configuration file.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before `init()` or `get_config()` to take effect.
///
/// Returns `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Returns the custom configuration path, if one was set.
pub fn custom_config_path() -> Option<&'static PathBuf> { CUSTOM_CONFIG_PATH.get() }

/// Loads the configuration from disk.
///
/// A missing file yields the defaults. Any other failure is reported and the
/// defaults are used.
fn load_or_default() -> BackdropConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "configuration loaded");
            let _ = CONFIG_PATH.set(path);
            config
        }
        Err(ConfigError::NotFound) => BackdropConfig::default(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            BackdropConfig::default()
        }
    }
}

/// Initializes and returns the global configuration instance.
///
/// This function is idempotent: calling it multiple times returns the same
/// configuration instance.
pub fn init() -> &'static BackdropConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the global configuration instance, initializing it if necessary.
pub fn get_config() -> &'static BackdropConfig { init() }

/// Returns the path to the loaded configuration file, if any.
pub fn get_config_path() -> Option<&'static PathBuf> { CONFIG_PATH.get() }

/// Returns the default cache root: `$XDG_CACHE_HOME/wallpaper` or `~/.cache/wallpaper`.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_DIR_NAME)
}

/// Resolves `config` into engine settings, reading overrides from the process environment.
#[must_use]
pub fn resolve(config: &BackdropConfig) -> EngineSettings {
    resolve_with(config, |key| std::env::var(key).ok())
}

/// Resolves `config` into engine settings with a custom environment lookup.
///
/// Environment overrides win over file values, which win over defaults.
pub fn resolve_with<F>(config: &BackdropConfig, lookup: F) -> EngineSettings
where F: Fn(&str) -> Option<String> {
    let from_env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let wallpaper_dir = from_env(env::WALLPAPER_DIR)
        .or_else(|| non_empty(&config.wallpaper_dir))
        .map_or_else(|| expand(DEFAULT_WALLPAPER_DIR), |dir| expand(&dir));

    let cache_dir = from_env(env::CACHE_DIR)
        .or_else(|| non_empty(&config.cache_dir))
        .map_or_else(default_cache_dir, |dir| expand(&dir));

    let default_wallpaper = non_empty(&config.default_wallpaper)
        .map(|path| expand_and_resolve(&path, &wallpaper_dir));

    EngineSettings {
        default_wallpaper,
        tools: config.tools.clone(),
        reloads: parse_commands(&config.reloads),
        effects: config.effects.clone(),
        after_set: parse_commands(&config.after_set),
        repository: config.repository.clone(),
        ..EngineSettings::with_dirs(wallpaper_dir, cache_dir)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Returns the preferred location for a new configuration file.
#[must_use]
pub fn preferred_config_path() -> Option<PathBuf> {
    custom_config_path().cloned().or_else(|| config_paths().into_iter().next())
}

/// Returns `true` if `path` is the configuration file in use.
#[must_use]
pub fn is_loaded_from(path: &Path) -> bool { get_config_path().is_some_and(|loaded| loaded == path) }

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn no_env(_: &str) -> Option<String> { None }

    #[test]
    fn test_resolve_defaults() {
        let settings = resolve_with(&BackdropConfig::default(), no_env);

        assert!(settings.wallpaper_dir.ends_with("Pictures/wallpaper"));
        assert!(!settings.wallpaper_dir.to_string_lossy().starts_with('~'));
        assert!(settings.cache_dir.ends_with("wallpaper"));
        assert!(settings.default_wallpaper.is_none());
        assert_eq!(settings.reloads.len(), 2);
    }

    #[test]
    fn test_resolve_uses_file_values() {
        let config = BackdropConfig {
            wallpaper_dir: "/walls".to_string(),
            cache_dir: "/cache".to_string(),
            default_wallpaper: "anime/tree.png".to_string(),
            reloads: vec!["makoctl reload".to_string(), "   ".to_string()],
            ..Default::default()
        };

        let settings = resolve_with(&config, no_env);

        assert_eq!(settings.wallpaper_dir, PathBuf::from("/walls"));
        assert_eq!(settings.cache_dir, PathBuf::from("/cache"));
        assert_eq!(settings.default_wallpaper, Some(PathBuf::from("/walls/anime/tree.png")));
        assert_eq!(settings.reloads.len(), 1);
    }

    #[test]
    fn test_environment_overrides_file() {
        let env: HashMap<&str, &str> =
            HashMap::from([("BACKDROP_WALLPAPER_DIR", "/env/walls"), ("BACKDROP_CACHE_DIR", "/env/cache")]);
        let config = BackdropConfig {
            wallpaper_dir: "/walls".to_string(),
            cache_dir: "/cache".to_string(),
            ..Default::default()
        };

        let settings = resolve_with(&config, |key| env.get(key).map(ToString::to_string));

        assert_eq!(settings.wallpaper_dir, PathBuf::from("/env/walls"));
        assert_eq!(settings.cache_dir, PathBuf::from("/env/cache"));
    }

    #[test]
    fn test_blank_environment_is_ignored() {
        let config = BackdropConfig { wallpaper_dir: "/walls".to_string(), ..Default::default() };

        let settings = resolve_with(&config, |_| Some(String::new()));

        assert_eq!(settings.wallpaper_dir, PathBuf::from("/walls"));
    }

    #[test]
    fn test_absolute_default_wallpaper_is_kept() {
        let config = BackdropConfig {
            wallpaper_dir: "/walls".to_string(),
            default_wallpaper: "/other/fallback.png".to_string(),
            ..Default::default()
        };

        let settings = resolve_with(&config, no_env);

        assert_eq!(settings.default_wallpaper, Some(PathBuf::from("/other/fallback.png")));
    }

    #[test]
    fn test_default_cache_dir_name() {
        assert!(default_cache_dir().ends_with(CACHE_DIR_NAME));
    }
}
