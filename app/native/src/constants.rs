//! Application-wide constants.

/// Application name, used for config directories and log prefixes.
pub const APP_NAME: &str = "backdrop";

/// Name of the cache directory under `$XDG_CACHE_HOME`.
pub const CACHE_DIR_NAME: &str = "wallpaper";

/// Default wallpaper directory, relative to the user's home.
pub const DEFAULT_WALLPAPER_DIR: &str = "~/Pictures/wallpaper";

/// Repository cloned by `backdrop update` when the wallpaper directory is not a git checkout.
pub const DEFAULT_REPOSITORY: &str = "https://github.com/dharmx/walls.git";

/// Environment variable names.
pub mod env {
    /// Overrides the wallpaper directory.
    pub const WALLPAPER_DIR: &str = "BACKDROP_WALLPAPER_DIR";
    /// Overrides the cache root.
    pub const CACHE_DIR: &str = "BACKDROP_CACHE_DIR";
    /// Log filter directives (falls back to `RUST_LOG`).
    pub const LOG: &str = "BACKDROP_LOG";
    /// Extra colon-separated directories searched for external tools.
    pub const EXTRA_PATHS: &str = "BACKDROP_EXTRA_PATHS";
}

/// Persisted state file names under the cache root.
pub mod state_files {
    /// Path of the most recently applied wallpaper.
    pub const CURRENT_WALLPAPER: &str = "current_wallpaper";
    /// Process id of the running automation loop.
    pub const AUTOMATION_PID: &str = "automation_pid";
    /// Directory holding per-source derived artifacts.
    pub const GENERATED_DIR: &str = "generated";
}

/// Hidden subcommand used by the spawned automation process.
pub const LOOP_COMMAND: &str = "_loop";
