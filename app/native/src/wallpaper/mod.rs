//! Wallpaper engine.
//!
//! Ties together selection, display, palette propagation and derived
//! artifacts. External tools are reached through a [`CommandRunner`] and
//! persisted state through a [`StateStore`], so the same engine runs against
//! the real system or against in-memory fakes.

pub mod artifact_cache;
pub mod derive;
pub mod effect;
pub mod error;
pub mod runner;
pub mod selector;
pub mod setter;
pub mod state;
pub mod theme;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub use artifact_cache::ArtifactCache;
pub use derive::{DerivationRunner, DeriveOutcome};
pub use effect::{BuiltinEffect, CustomEffect, EffectKind};
pub use error::WallpaperError;
pub use runner::{CommandRunner, Invocation, SystemRunner};
pub use selector::Selector;
pub use setter::{EffectReport, SetReport, WallpaperSetter};
pub use state::{FileStateStore, MemoryStateStore, StateStore};
pub use theme::ThemePropagator;

use crate::config::ToolsConfig;
use crate::constants::DEFAULT_REPOSITORY;

/// Reload commands run after the palette is regenerated.
pub const DEFAULT_RELOADS: &[&str] = &["systemctl --user restart waybar.service", "makoctl reload"];

/// Hooks run after a wallpaper is set from the command line.
pub const DEFAULT_AFTER_SET: &[&str] = &["fastfetch --logo-recache"];

/// Resolved engine settings.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Root of the wallpaper collection.
    pub wallpaper_dir: PathBuf,
    /// Root of the cache and state files.
    pub cache_dir: PathBuf,
    /// Wallpaper used when no current wallpaper has been recorded.
    pub default_wallpaper: Option<PathBuf>,
    /// External tool names.
    pub tools: ToolsConfig,
    /// Commands run after palette generation.
    pub reloads: Vec<Invocation>,
    /// Effects derived from every wallpaper.
    pub effects: Vec<EffectKind>,
    /// Commands run after a wallpaper is set from the command line.
    pub after_set: Vec<Invocation>,
    /// Git URL cloned by `update`.
    pub repository: String,
}

impl EngineSettings {
    /// Default settings for the given directories.
    #[must_use]
    pub fn with_dirs(wallpaper_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            wallpaper_dir: wallpaper_dir.into(),
            cache_dir: cache_dir.into(),
            default_wallpaper: None,
            tools: ToolsConfig::default(),
            reloads: parse_commands(DEFAULT_RELOADS),
            effects: EffectKind::defaults(),
            after_set: parse_commands(DEFAULT_AFTER_SET),
            repository: DEFAULT_REPOSITORY.to_string(),
        }
    }
}

/// Parses command lines, dropping blank entries.
#[must_use]
pub fn parse_commands<S: AsRef<str>>(lines: &[S]) -> Vec<Invocation> {
    lines.iter().filter_map(|line| Invocation::parse(line.as_ref())).collect()
}

/// What `update` did to the wallpaper directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// An existing checkout was pulled.
    Pulled,
    /// The repository was cloned.
    Cloned,
}

/// Coordinates wallpaper operations.
pub struct WallpaperEngine {
    settings: EngineSettings,
    cache: ArtifactCache,
    selector: Selector,
    runner: Arc<dyn CommandRunner>,
    state: Arc<dyn StateStore>,
}

impl WallpaperEngine {
    /// Creates an engine over the given collaborators.
    #[must_use]
    pub fn new(
        settings: EngineSettings,
        runner: Arc<dyn CommandRunner>,
        state: Arc<dyn StateStore>,
    ) -> Self {
        let cache = ArtifactCache::new(&settings.cache_dir);
        let selector = Selector::new(&settings.wallpaper_dir);
        Self { settings, cache, selector, runner, state }
    }

    /// Creates an engine running real commands and keeping state under the cache root.
    #[must_use]
    pub fn system(settings: EngineSettings) -> Self {
        let state = Arc::new(FileStateStore::new(&settings.cache_dir));
        Self::new(settings, Arc::new(SystemRunner), state)
    }

    /// Returns the engine settings.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings { &self.settings }

    /// Returns the artifact cache.
    #[must_use]
    pub const fn cache(&self) -> &ArtifactCache { &self.cache }

    /// Returns the selector.
    #[must_use]
    pub const fn selector(&self) -> &Selector { &self.selector }

    /// Returns the command runner.
    #[must_use]
    pub fn runner(&self) -> Arc<dyn CommandRunner> { Arc::clone(&self.runner) }

    /// Returns the state store.
    #[must_use]
    pub fn state(&self) -> Arc<dyn StateStore> { Arc::clone(&self.state) }

    fn setter(&self) -> WallpaperSetter<'_> {
        WallpaperSetter::new(self.runner.as_ref(), self.state.as_ref(), &self.cache, &self.settings)
    }

    fn propagator(&self) -> ThemePropagator<'_> {
        ThemePropagator::new(self.runner.as_ref(), &self.settings.tools.palette, &self.settings.reloads)
    }

    /// Sets `image` as the wallpaper.
    ///
    /// # Errors
    ///
    /// See [`WallpaperSetter::set`].
    pub fn set(&self, image: &Path) -> Result<SetReport, WallpaperError> { self.setter().set(image) }

    /// Picks a random wallpaper, optionally from a category, and sets it.
    ///
    /// # Errors
    ///
    /// Returns selection errors and display failures.
    pub fn shuffle(&self, category: Option<&str>) -> Result<SetReport, WallpaperError> {
        let image = self.selector.select(category)?;
        self.set(&image)
    }

    /// Returns the recorded wallpaper, falling back to the configured default.
    ///
    /// # Errors
    ///
    /// Returns an error if the state record cannot be read.
    pub fn current(&self) -> Result<Option<PathBuf>, WallpaperError> {
        Ok(self.state.current_wallpaper()?.or_else(|| self.settings.default_wallpaper.clone()))
    }

    fn require_current(&self) -> Result<PathBuf, WallpaperError> {
        self.current()?.ok_or(WallpaperError::NoCurrentWallpaper)
    }

    /// Shows the current wallpaper again without touching the palette or effects.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no current wallpaper or the display step fails.
    pub fn restore(&self) -> Result<PathBuf, WallpaperError> {
        let image = self.require_current()?;
        if !image.is_file() {
            return Err(WallpaperError::FileNotFound(image));
        }
        let invocation = self.setter().display_invocation(&image);
        self.runner.terminate_all(invocation.process_name());
        self.runner.launch(&invocation)?;
        tracing::info!(path = %image.display(), "wallpaper restored");
        Ok(image)
    }

    /// Regenerates the palette from the current wallpaper and reloads its consumers.
    ///
    /// Returns the wallpaper and the number of failed reloads.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no current wallpaper or the palette generator fails.
    pub fn color(&self) -> Result<(PathBuf, usize), WallpaperError> {
        let image = self.require_current()?;
        let failed = self.propagator().propagate(&image)?;
        Ok((image, failed))
    }

    /// Runs the configured after-set hooks. Failures are logged only.
    pub fn run_after_set(&self) {
        for hook in &self.settings.after_set {
            if let Err(err) = self.runner.run(hook) {
                tracing::debug!(command = %hook, error = %err, "after-set hook failed");
            }
        }
    }

    /// Raises a desktop notification if the notification tool is installed.
    pub fn notify(&self, summary: &str, body: Option<&str>) {
        let mut invocation = Invocation::new(&self.settings.tools.notify).arg(summary);
        if let Some(body) = body {
            invocation = invocation.arg(body);
        }
        match self.runner.run(&invocation) {
            Ok(()) | Err(WallpaperError::MissingCapability(_)) => {}
            Err(err) => tracing::debug!(error = %err, "notification failed"),
        }
    }

    /// Lists eligible wallpapers in natural order.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection root does not exist.
    pub fn list(&self, category: Option<&str>) -> Result<Vec<PathBuf>, WallpaperError> {
        self.selector.list(category)
    }

    /// Pulls the wallpaper repository, or clones it if the directory is not a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if git is missing or fails.
    pub fn update(&self) -> Result<UpdateAction, WallpaperError> {
        let dir = &self.settings.wallpaper_dir;
        if dir.join(".git").exists() {
            tracing::info!(path = %dir.display(), "pulling wallpaper repository");
            self.runner.run(&Invocation::new("git").arg("-C").arg(dir).arg("pull"))?;
            return Ok(UpdateAction::Pulled);
        }

        tracing::info!(repository = %self.settings.repository, "cloning wallpaper repository");
        self.runner.run(
            &Invocation::new("git").arg("clone").arg(&self.settings.repository).arg(dir),
        )?;
        Ok(UpdateAction::Cloned)
    }

    /// Sets every wallpaper in turn so that all effects get cached.
    ///
    /// Pauses `interval` between wallpapers and stops at the first failure.
    /// `progress` is called after each successful set with its position and
    /// the total count. Returns the number of wallpapers set.
    ///
    /// # Errors
    ///
    /// Returns the first selection or set error.
    pub fn fill_cache<F>(&self, interval: Duration, mut progress: F) -> Result<usize, WallpaperError>
    where F: FnMut(usize, usize, &SetReport) {
        let images = self.list(None)?;
        let total = images.len();

        for (index, image) in images.iter().enumerate() {
            let report = self.set(image)?;
            self.run_after_set();
            progress(index + 1, total, &report);
            if index + 1 < total {
                std::thread::sleep(interval);
            }
        }
        Ok(total)
    }
}

impl std::fmt::Debug for WallpaperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WallpaperEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::testing::RecordingRunner;

    struct Fixture {
        temp_dir: TempDir,
        runner: Arc<RecordingRunner>,
        state: Arc<MemoryStateStore>,
        engine: WallpaperEngine,
    }

    fn fixture_with(runner: RecordingRunner) -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let settings =
            EngineSettings::with_dirs(temp_dir.path().join("walls"), temp_dir.path().join("cache"));
        let runner = Arc::new(runner);
        let state = Arc::new(MemoryStateStore::new());
        let engine = WallpaperEngine::new(settings, runner.clone(), state.clone());
        Fixture { temp_dir, runner, state, engine }
    }

    fn fixture() -> Fixture { fixture_with(RecordingRunner::new().producing("magick")) }

    impl Fixture {
        fn wallpaper(&self, relative: &str) -> PathBuf {
            let path = self.temp_dir.path().join("walls").join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"png").unwrap();
            path.canonicalize().unwrap()
        }
    }

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::with_dirs("/walls", "/cache");
        assert_eq!(settings.effects, EffectKind::defaults());
        assert_eq!(settings.reloads.len(), 2);
        assert_eq!(settings.after_set[0].to_string(), "fastfetch --logo-recache");
        assert_eq!(settings.repository, DEFAULT_REPOSITORY);
    }

    #[test]
    fn test_current_falls_back_to_default_wallpaper() {
        let mut fixture = fixture();
        assert!(fixture.engine.current().unwrap().is_none());

        let mut settings = fixture.engine.settings().clone();
        settings.default_wallpaper = Some(PathBuf::from("/walls/default.png"));
        fixture.engine = WallpaperEngine::new(settings, fixture.runner.clone(), fixture.state.clone());
        assert_eq!(fixture.engine.current().unwrap(), Some(PathBuf::from("/walls/default.png")));

        fixture.state.set_current_wallpaper(Path::new("/walls/a.png")).unwrap();
        assert_eq!(fixture.engine.current().unwrap(), Some(PathBuf::from("/walls/a.png")));
    }

    #[test]
    fn test_shuffle_sets_wallpaper_from_category() {
        let fixture = fixture();
        let image = fixture.wallpaper("space/a.png");
        fixture.wallpaper("nature/b.png");

        let report = fixture.engine.shuffle(Some("space")).unwrap();

        assert_eq!(report.wallpaper, image);
        assert_eq!(fixture.state.current_wallpaper().unwrap(), Some(image));
    }

    #[test]
    fn test_restore_only_runs_display() {
        let fixture = fixture();
        let image = fixture.wallpaper("a.png");
        fixture.state.set_current_wallpaper(&image).unwrap();

        assert_eq!(fixture.engine.restore().unwrap(), image);
        assert_eq!(fixture.runner.launches().len(), 1);
        assert!(fixture.runner.invocations().iter().all(|inv| inv.program() == "swaybg"));
    }

    #[test]
    fn test_restore_without_state_fails() {
        let fixture = fixture();
        assert!(matches!(fixture.engine.restore(), Err(WallpaperError::NoCurrentWallpaper)));
    }

    #[test]
    fn test_color_runs_palette_and_reloads() {
        let fixture = fixture();
        let image = fixture.wallpaper("a.png");
        fixture.state.set_current_wallpaper(&image).unwrap();

        let (colored, failed) = fixture.engine.color().unwrap();

        assert_eq!(colored, image);
        assert_eq!(failed, 0);
        assert_eq!(fixture.runner.programs(), vec!["wallust", "systemctl", "makoctl"]);
    }

    #[test]
    fn test_notify_skips_missing_tool() {
        let fixture = fixture_with(RecordingRunner::new().producing("magick").missing("notify-send"));
        fixture.engine.notify("Automation stopped.", Some("Error setting wallpaper"));
        assert_eq!(fixture.runner.count_program("notify-send"), 1);
    }

    #[test]
    fn test_notify_passes_summary_and_body() {
        let fixture = fixture();
        fixture.engine.notify("Wallpaper automation stopped", None);
        fixture.engine.notify("Automation stopped.", Some("Error setting wallpaper"));

        let invocations = fixture.runner.invocations();
        assert_eq!(invocations[0].arguments().len(), 1);
        assert_eq!(invocations[1].arguments().len(), 2);
    }

    #[test]
    fn test_update_clones_when_not_a_checkout() {
        let fixture = fixture();
        assert_eq!(fixture.engine.update().unwrap(), UpdateAction::Cloned);

        let clone = &fixture.runner.invocations()[0];
        assert!(clone.to_string().starts_with("git clone https://github.com/dharmx/walls.git"));
    }

    #[test]
    fn test_update_pulls_existing_checkout() {
        let fixture = fixture();
        fs::create_dir_all(fixture.temp_dir.path().join("walls/.git")).unwrap();

        assert_eq!(fixture.engine.update().unwrap(), UpdateAction::Pulled);
        assert!(fixture.runner.invocations()[0].to_string().ends_with("pull"));
    }

    #[test]
    fn test_fill_cache_sets_every_wallpaper() {
        let fixture = fixture();
        fixture.wallpaper("a.png");
        fixture.wallpaper("nested/b.jpg");
        let mut seen = Vec::new();

        let total = fixture
            .engine
            .fill_cache(Duration::ZERO, |index, total, report| {
                seen.push((index, total, report.wallpaper.clone()));
            })
            .unwrap();

        assert_eq!(total, 2);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].0, 2);
        assert_eq!(fixture.runner.count_program("fastfetch"), 2);
        assert_eq!(fixture.runner.count_program("magick"), 4);
    }

    #[test]
    fn test_fill_cache_stops_at_first_failure() {
        let fixture = fixture_with(RecordingRunner::new().producing("magick").missing("swaybg"));
        fixture.wallpaper("a.png");
        fixture.wallpaper("b.png");
        let mut calls = 0;

        let result = fixture.engine.fill_cache(Duration::ZERO, |_, _, _| calls += 1);

        assert!(matches!(result, Err(WallpaperError::MissingCapability(_))));
        assert_eq!(calls, 0);
        assert_eq!(fixture.runner.launches().len(), 1);
    }
}
