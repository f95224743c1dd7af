//! Cache CLI commands.

use crate::automation::AutomationController;
use crate::cache::{clear_cache, format_bytes};
use crate::error::BackdropError;
use crate::wallpaper::WallpaperEngine;

/// Stops automation, then removes the cache root and recreates it empty.
///
/// # Errors
///
/// Returns an error if the running loop cannot be stopped or the cache
/// directory cannot be cleared.
pub fn execute_clear(
    engine: &WallpaperEngine,
    controller: &AutomationController,
) -> Result<(), BackdropError> {
    if let Some(pid) = controller.stop()? {
        println!("Automation stopped (pid {pid})");
    }

    let root = engine.cache().root();
    let freed = clear_cache(root).map_err(|err| {
        BackdropError::Cache(format!("Failed to clear {}: {err}", root.display()))
    })?;

    println!("Cache cleared: {} ({} freed)", root.display(), format_bytes(freed));
    Ok(())
}
