//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// Backdrop Configuration File
// ===========================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // ============================================================================
  // Directories
  // ============================================================================
  // Wallpaper collection (searched recursively for jpg, jpeg and png files).
  // BACKDROP_WALLPAPER_DIR takes precedence over this value.
  // "wallpaperDir": "~/Pictures/wallpaper",

  // Cache root for derived images and state files.
  // Empty means $XDG_CACHE_HOME/wallpaper. BACKDROP_CACHE_DIR takes precedence.
  // "cacheDir": "",

  // Wallpaper used by `restore` and `color` before anything has been set.
  // Relative paths are resolved against wallpaperDir.
  // "defaultWallpaper": "anime/a_tree_trunk_with_a_branch.png",

  // ============================================================================
  // External Tools
  // ============================================================================
  // "tools": {
  //   // Paints the wallpaper: <display> -m fill -i <path>
  //   "display": "swaybg",
  //
  //   // Generates the color palette: <palette> run <path>
  //   "palette": "wallust",
  //
  //   // Produces effect images: <transform> <source> <args...> <output>
  //   "transform": "magick",
  //
  //   // Desktop notifications (skipped when not installed)
  //   "notify": "notify-send"
  // },

  // ============================================================================
  // Theme Propagation
  // ============================================================================
  // Commands run in order once the palette has been generated.
  // "reloads": [
  //   "systemctl --user restart waybar.service",
  //   "makoctl reload"
  // ],

  // ============================================================================
  // Effects
  // ============================================================================
  // Images derived from every wallpaper and cached under the cache root.
  // Built-in: "square" (1:1 crop at 25%) and "blurred" (blur at 75%).
  // "effects": [
  //   "square",
  //   "blurred"
  //   // { "name": "dim", "args": ["-brightness-contrast", "-30x0"] }
  // ],

  // ============================================================================
  // Hooks
  // ============================================================================
  // Commands run after `set`, `shuffle`, `color` and each `fill-cache` step.
  // "afterSet": [
  //   "fastfetch --logo-recache"
  // ],

  // Repository cloned by `backdrop update`.
  // "repository": "https://github.com/dharmx/walls.git"
}
"##
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
