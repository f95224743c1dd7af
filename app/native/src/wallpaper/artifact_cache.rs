//! Cache of artifacts derived from wallpapers.
//!
//! Layout under the cache root:
//!
//! - `generated/<effect>-<basename>.png` - one entry per (effect, source basename)
//! - `<effect>-wallpaper.png` - the most recently produced artifact of each effect
//!
//! Entries never expire. Identity is the source file's basename, so two images
//! with the same name in different directories share an entry.

use std::path::{Path, PathBuf};

use super::effect::EffectKind;
use super::error::WallpaperError;
use crate::constants::state_files::GENERATED_DIR;
use crate::platform::fs::copy_atomic;

/// File-backed store of derived wallpaper artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    /// Creates a cache rooted at `root`. Nothing is created on disk until first use.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Returns the cache root.
    #[must_use]
    pub fn root(&self) -> &Path { &self.root }

    /// Returns the directory holding per-source entries.
    #[must_use]
    pub fn generated_dir(&self) -> PathBuf { self.root.join(GENERATED_DIR) }

    /// Returns the per-source cache location for `(effect, image)`.
    ///
    /// Images without a file name (e.g. `/`) map to the `wallpaper` basename.
    #[must_use]
    pub fn entry_path(&self, effect: &EffectKind, image: &Path) -> PathBuf {
        let basename = image.file_name().unwrap_or_else(|| std::ffi::OsStr::new("wallpaper"));
        self.generated_dir().join(effect.cache_file_name(basename))
    }

    /// Returns the generic-latest location for `effect`.
    #[must_use]
    pub fn latest_path(&self, effect: &EffectKind) -> PathBuf {
        self.root.join(effect.latest_file_name())
    }

    /// Returns the cached artifact for `(effect, image)` if one exists.
    #[must_use]
    pub fn lookup(&self, effect: &EffectKind, image: &Path) -> Option<PathBuf> {
        let path = self.entry_path(effect, image);
        path.is_file().then_some(path)
    }

    /// Copies a cached artifact to the generic-latest location.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails.
    pub fn promote(&self, effect: &EffectKind, cached: &Path) -> Result<PathBuf, WallpaperError> {
        let latest = self.latest_path(effect);
        copy_atomic(cached, &latest).map_err(|err| WallpaperError::io(&latest, err))?;
        Ok(latest)
    }

    /// Stores a freshly produced artifact as the entry for `(effect, image)` and
    /// as the generic-latest artifact.
    ///
    /// Returns the path of the per-source entry.
    ///
    /// # Errors
    ///
    /// Returns an error if either copy fails.
    pub fn store(
        &self,
        effect: &EffectKind,
        image: &Path,
        produced: &Path,
    ) -> Result<PathBuf, WallpaperError> {
        let entry = self.entry_path(effect, image);
        copy_atomic(produced, &entry).map_err(|err| WallpaperError::io(&entry, err))?;
        self.promote(effect, &entry)?;
        Ok(entry)
    }

    /// Returns a scratch file location for producing a new artifact of `effect`.
    ///
    /// The file lives in the generated directory so the final copy stays on one
    /// filesystem. It is removed when the returned handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated directory cannot be created.
    pub fn scratch_file(
        &self,
        effect: &EffectKind,
    ) -> Result<tempfile::NamedTempFile, WallpaperError> {
        let dir = self.generated_dir();
        std::fs::create_dir_all(&dir).map_err(|err| WallpaperError::io(&dir, err))?;
        tempfile::Builder::new()
            .prefix(&format!(".{}-", effect.name()))
            .suffix(".png")
            .tempfile_in(&dir)
            .map_err(|err| WallpaperError::io(&dir, err))
    }
}
