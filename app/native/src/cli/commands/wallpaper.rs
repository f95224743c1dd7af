//! Wallpaper CLI commands.
//!
//! Handlers for setting, selecting, listing and caching wallpapers.

use std::path::Path;
use std::time::Duration;

use crate::cli::output;
use crate::error::BackdropError;
use crate::wallpaper::{UpdateAction, WallpaperEngine, WallpaperError};

/// Prints the current wallpaper path.
///
/// # Errors
///
/// Returns an error if no wallpaper has been set and no default is configured.
pub fn execute_current(engine: &WallpaperEngine) -> Result<(), BackdropError> {
    let current = engine.current()?.ok_or(WallpaperError::NoCurrentWallpaper)?;
    println!("{}", current.display());
    Ok(())
}

/// Sets `path` as the wallpaper and runs the after-set hooks.
///
/// # Errors
///
/// Returns an error if the file does not exist or the display step fails.
pub fn execute_set(engine: &WallpaperEngine, path: &Path) -> Result<(), BackdropError> {
    let report = engine.set(path)?;
    engine.run_after_set();
    output::print_set_report(&report);
    Ok(())
}

/// Sets a random wallpaper and runs the after-set hooks.
///
/// # Errors
///
/// Returns selection errors and display failures.
pub fn execute_shuffle(engine: &WallpaperEngine, category: Option<&str>) -> Result<(), BackdropError> {
    let report = engine.shuffle(category)?;
    engine.run_after_set();
    output::print_set_report(&report);
    Ok(())
}

/// Regenerates the palette from the current wallpaper.
///
/// # Errors
///
/// Returns an error if there is no current wallpaper or the palette tool fails.
pub fn execute_color(engine: &WallpaperEngine) -> Result<(), BackdropError> {
    let (image, failed) = engine.color()?;
    engine.run_after_set();
    println!("{}", image.display());
    if failed > 0 {
        eprintln!("{} {failed} theme reload(s) failed", output::format_bool(false));
    }
    Ok(())
}

/// Paints the current wallpaper again.
///
/// # Errors
///
/// Returns an error if there is no current wallpaper or the display step fails.
pub fn execute_restore(engine: &WallpaperEngine) -> Result<(), BackdropError> {
    let image = engine.restore()?;
    println!("{}", image.display());
    Ok(())
}

/// Pulls or clones the wallpaper repository.
///
/// # Errors
///
/// Returns an error if git is missing or fails.
pub fn execute_update(engine: &WallpaperEngine) -> Result<(), BackdropError> {
    let dir = &engine.settings().wallpaper_dir;
    match engine.update()? {
        UpdateAction::Pulled => println!("Wallpapers updated in {}", dir.display()),
        UpdateAction::Cloned => println!("Wallpapers cloned into {}", dir.display()),
    }
    Ok(())
}

/// Lists eligible wallpapers, one per line or as a JSON array.
///
/// # Errors
///
/// Returns an error if the directory or category does not exist.
pub fn execute_list(
    engine: &WallpaperEngine,
    category: Option<&str>,
    json: bool,
) -> Result<(), BackdropError> {
    let wallpapers = engine.list(category)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&wallpapers)?);
    } else if wallpapers.is_empty() {
        eprintln!("No wallpapers found.");
    } else {
        for wallpaper in &wallpapers {
            println!("{}", wallpaper.display());
        }
    }

    Ok(())
}

/// Sets every wallpaper in turn, pausing `interval` seconds between them.
///
/// # Errors
///
/// Returns an error for a negative or non-finite interval, and the first
/// failure while setting.
pub fn execute_fill_cache(engine: &WallpaperEngine, interval: f64) -> Result<(), BackdropError> {
    let pause = Duration::try_from_secs_f64(interval).map_err(|_| {
        BackdropError::InvalidArguments(format!(
            "Interval must be a non-negative number of seconds, got {interval}"
        ))
    })?;

    let total = engine.fill_cache(pause, output::print_progress)?;
    println!("Cached effects for {total} wallpaper(s).");
    Ok(())
}
