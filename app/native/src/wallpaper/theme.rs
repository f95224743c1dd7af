//! Palette generation and reload of dependent UI components.

use std::path::Path;

use super::error::WallpaperError;
use super::runner::{CommandRunner, Invocation};

/// Regenerates the color palette from a wallpaper and reloads its consumers.
#[derive(Clone, Copy)]
pub struct ThemePropagator<'a> {
    runner: &'a dyn CommandRunner,
    palette_tool: &'a str,
    reloads: &'a [Invocation],
}

impl<'a> ThemePropagator<'a> {
    /// Creates a propagator running `palette_tool` followed by `reloads`.
    #[must_use]
    pub fn new(
        runner: &'a dyn CommandRunner,
        palette_tool: &'a str,
        reloads: &'a [Invocation],
    ) -> Self {
        Self { runner, palette_tool, reloads }
    }

    /// Runs the palette generator on `image`, then every reload in order.
    ///
    /// Reloads only run once the palette exists. A failing reload is logged
    /// and the remaining reloads still run.
    ///
    /// Returns the number of reloads that failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the palette generator is missing or fails.
    pub fn propagate(&self, image: &Path) -> Result<usize, WallpaperError> {
        let palette = Invocation::new(self.palette_tool).arg("run").arg(image);
        if let Err(err) = self.runner.run(&palette) {
            tracing::warn!(image = %image.display(), error = %err, "palette generation failed, skipping reloads");
            return Err(err);
        }

        let failed = self
            .reloads
            .iter()
            .filter(|reload| {
                self.runner
                    .run(reload)
                    .inspect_err(|err| tracing::warn!(command = %reload, error = %err, "reload failed"))
                    .is_err()
            })
            .count();
        Ok(failed)
    }
}

impl std::fmt::Debug for ThemePropagator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemePropagator")
            .field("palette_tool", &self.palette_tool)
            .field("reloads", &self.reloads)
            .finish_non_exhaustive()
    }
}
