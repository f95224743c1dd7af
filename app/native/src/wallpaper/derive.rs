//! Derivation of per-effect artifacts through the external transform tool.

use std::path::{Path, PathBuf};

use super::artifact_cache::ArtifactCache;
use super::effect::EffectKind;
use super::error::WallpaperError;
use super::runner::{CommandRunner, Invocation};

/// How a derivation was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeriveOutcome {
    /// A cached artifact was reused; no transformation ran.
    Cached(PathBuf),
    /// The transform tool produced a new artifact.
    Generated(PathBuf),
}

impl DeriveOutcome {
    /// Returns the per-source cache entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Cached(path) | Self::Generated(path) => path,
        }
    }

    /// Returns `true` if the transform tool ran.
    #[must_use]
    pub const fn was_generated(&self) -> bool { matches!(self, Self::Generated(_)) }
}

/// Produces effect artifacts, consulting the cache first.
#[derive(Clone, Copy)]
pub struct DerivationRunner<'a> {
    cache: &'a ArtifactCache,
    runner: &'a dyn CommandRunner,
    tool: &'a str,
}

impl<'a> DerivationRunner<'a> {
    /// Creates a runner that invokes `tool` for cache misses.
    #[must_use]
    pub fn new(cache: &'a ArtifactCache, runner: &'a dyn CommandRunner, tool: &'a str) -> Self {
        Self { cache, runner, tool }
    }

    /// Builds the transform command line for `effect`.
    #[must_use]
    pub fn invocation(&self, effect: &EffectKind, source: &Path, output: &Path) -> Invocation {
        Invocation::new(self.tool).arg(source).args(effect.args()).arg(output)
    }

    /// Ensures the artifact for `(effect, image)` exists and is the generic-latest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform tool is missing, fails or writes an
    /// empty output, or if the cache cannot be written. Nothing is cached on
    /// failure.
    pub fn derive(&self, effect: &EffectKind, image: &Path) -> Result<DeriveOutcome, WallpaperError> {
        if let Some(cached) = self.cache.lookup(effect, image) {
            tracing::debug!(effect = %effect, path = %cached.display(), "cache hit");
            self.cache.promote(effect, &cached)?;
            return Ok(DeriveOutcome::Cached(cached));
        }

        let scratch = self.cache.scratch_file(effect)?;
        let invocation = self.invocation(effect, image, scratch.path());
        if let Err(err) = self.runner.run(&invocation) {
            tracing::warn!(effect = %effect, image = %image.display(), error = %err, "effect failed");
            return Err(err);
        }

        let produced =
            std::fs::metadata(scratch.path()).map_err(|err| WallpaperError::io(scratch.path(), err))?;
        if produced.len() == 0 {
            tracing::warn!(effect = %effect, image = %image.display(), "effect produced no output");
            return Err(WallpaperError::ExternalFailure {
                command: invocation.to_string(),
                status: "produced no output".to_string(),
            });
        }

        let entry = self.cache.store(effect, image, scratch.path())?;
        tracing::info!(effect = %effect, path = %entry.display(), "effect generated");
        Ok(DeriveOutcome::Generated(entry))
    }
}

impl std::fmt::Debug for DerivationRunner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivationRunner")
            .field("cache", &self.cache.root())
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}
