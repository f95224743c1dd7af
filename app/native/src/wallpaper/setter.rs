//! Applying a wallpaper.
//!
//! Setting a wallpaper fans out into one palette task and one task per
//! effect, while the display step runs on the calling thread. The current
//! wallpaper is recorded as soon as the display step succeeds, before the
//! other tasks are joined.

use std::path::{Path, PathBuf};

use super::artifact_cache::ArtifactCache;
use super::derive::{DerivationRunner, DeriveOutcome};
use super::effect::EffectKind;
use super::error::WallpaperError;
use super::runner::{CommandRunner, Invocation};
use super::state::StateStore;
use super::theme::ThemePropagator;
use super::EngineSettings;

/// Outcome of one effect during a set.
#[derive(Debug)]
pub struct EffectReport {
    /// The effect that ran.
    pub effect: EffectKind,
    /// Its result.
    pub outcome: Result<DeriveOutcome, WallpaperError>,
}

/// Summary of a successful set.
#[derive(Debug)]
pub struct SetReport {
    /// The absolute path that was applied and recorded.
    pub wallpaper: PathBuf,
    /// Palette result: number of failed reloads, or the palette error.
    pub palette: Result<usize, WallpaperError>,
    /// Per-effect results, in configuration order.
    pub effects: Vec<EffectReport>,
}

impl SetReport {
    /// Returns `true` if the palette and every effect succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        matches!(self.palette, Ok(0)) && self.effects.iter().all(|report| report.outcome.is_ok())
    }

    /// Number of effects that ran the transform tool.
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.effects
            .iter()
            .filter(|report| report.outcome.as_ref().is_ok_and(DeriveOutcome::was_generated))
            .count()
    }
}

/// Applies wallpapers and keeps derived state in sync.
#[derive(Clone, Copy)]
pub struct WallpaperSetter<'a> {
    runner: &'a dyn CommandRunner,
    state: &'a dyn StateStore,
    cache: &'a ArtifactCache,
    settings: &'a EngineSettings,
}

impl<'a> WallpaperSetter<'a> {
    /// Creates a setter over the given collaborators.
    #[must_use]
    pub fn new(
        runner: &'a dyn CommandRunner,
        state: &'a dyn StateStore,
        cache: &'a ArtifactCache,
        settings: &'a EngineSettings,
    ) -> Self {
        Self { runner, state, cache, settings }
    }

    /// Builds the display command for `image`.
    #[must_use]
    pub fn display_invocation(&self, image: &Path) -> Invocation {
        Invocation::new(&self.settings.tools.display).args(["-m", "fill", "-i"]).arg(image)
    }

    /// Replaces any running display process with one showing `image`.
    fn apply_display(&self, image: &Path) -> Result<(), WallpaperError> {
        let invocation = self.display_invocation(image);
        self.runner.terminate_all(invocation.process_name());
        self.runner.launch(&invocation)
    }

    /// Sets `image` as the wallpaper.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::FileNotFound`] without side effects if `image`
    /// is not a file. Returns the display error if the display step fails, in
    /// which case the current wallpaper record is left unchanged. Palette and
    /// effect failures are reported in the [`SetReport`] only.
    pub fn set(&self, image: &Path) -> Result<SetReport, WallpaperError> {
        if !image.is_file() {
            return Err(WallpaperError::FileNotFound(image.to_path_buf()));
        }
        let image = image.canonicalize().map_err(|err| WallpaperError::io(image, err))?;
        let image = image.as_path();
        tracing::info!(path = %image.display(), "setting wallpaper");

        let propagator = ThemePropagator::new(
            self.runner,
            &self.settings.tools.palette,
            &self.settings.reloads,
        );
        let deriver = DerivationRunner::new(self.cache, self.runner, &self.settings.tools.transform);

        let mut palette = None;
        let mut outcomes: Vec<Option<Result<DeriveOutcome, WallpaperError>>> =
            self.settings.effects.iter().map(|_| None).collect();
        let mut applied = Ok(());

        rayon::scope(|scope| {
            let palette_slot = &mut palette;
            scope.spawn(move |_| *palette_slot = Some(propagator.propagate(image)));

            for (slot, effect) in outcomes.iter_mut().zip(&self.settings.effects) {
                scope.spawn(move |_| *slot = Some(deriver.derive(effect, image)));
            }

            applied = self
                .apply_display(image)
                .and_then(|()| self.state.set_current_wallpaper(image));
        });

        if let Err(err) = applied {
            tracing::debug!(path = %image.display(), error = %err, "display step failed");
            return Err(err);
        }

        let effects = self
            .settings
            .effects
            .iter()
            .cloned()
            .zip(outcomes)
            .map(|(effect, outcome)| EffectReport {
                effect,
                outcome: outcome.unwrap_or_else(|| {
                    Err(WallpaperError::ExternalFailure {
                        command: "effect task".to_string(),
                        status: "did not complete".to_string(),
                    })
                }),
            })
            .collect();
        let palette = palette.unwrap_or_else(|| {
            Err(WallpaperError::ExternalFailure {
                command: "palette task".to_string(),
                status: "did not complete".to_string(),
            })
        });

        Ok(SetReport { wallpaper: image.to_path_buf(), palette, effects })
    }
}

impl std::fmt::Debug for WallpaperSetter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WallpaperSetter")
            .field("cache", &self.cache.root())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
