//! Persisted wallpaper and automation state.
//!
//! Two records survive between invocations: the path of the last successfully
//! applied wallpaper and the process id of the running automation loop. Both
//! are small text files under the cache root, so other tools (and the detached
//! loop) can read them without going through this process.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::error::WallpaperError;
use crate::constants::state_files::{AUTOMATION_PID, CURRENT_WALLPAPER};
use crate::platform::fs::write_atomic;

/// Read/write access to persisted state.
pub trait StateStore: Send + Sync {
    /// Returns the most recently applied wallpaper, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn current_wallpaper(&self) -> Result<Option<PathBuf>, WallpaperError>;

    /// Records `path` as the current wallpaper.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn set_current_wallpaper(&self, path: &Path) -> Result<(), WallpaperError>;

    /// Returns the recorded automation process id.
    ///
    /// Unparsable records are reported as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn automation_pid(&self) -> Result<Option<u32>, WallpaperError>;

    /// Records `pid` as the automation process.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn set_automation_pid(&self, pid: u32) -> Result<(), WallpaperError>;

    /// Removes the automation record. Removing a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing record cannot be removed.
    fn clear_automation_pid(&self) -> Result<(), WallpaperError>;
}

/// State kept in text files under a directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    root: PathBuf,
}

impl FileStateStore {
    /// Creates a store rooted at `root` (normally the cache root).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Returns the path of the current-wallpaper record.
    #[must_use]
    pub fn current_wallpaper_path(&self) -> PathBuf { self.root.join(CURRENT_WALLPAPER) }

    /// Returns the path of the automation pid record.
    #[must_use]
    pub fn automation_pid_path(&self) -> PathBuf { self.root.join(AUTOMATION_PID) }

    fn read_trimmed(path: &Path) -> Result<Option<String>, WallpaperError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(WallpaperError::io(path, err)),
        }
    }
}

impl StateStore for FileStateStore {
    fn current_wallpaper(&self) -> Result<Option<PathBuf>, WallpaperError> {
        Ok(Self::read_trimmed(&self.current_wallpaper_path())?.map(PathBuf::from))
    }

    fn set_current_wallpaper(&self, path: &Path) -> Result<(), WallpaperError> {
        let record = self.current_wallpaper_path();
        write_atomic(&record, path.as_os_str().as_encoded_bytes())
            .map_err(|err| WallpaperError::io(&record, err))
    }

    fn automation_pid(&self) -> Result<Option<u32>, WallpaperError> {
        let record = self.automation_pid_path();
        let Some(contents) = Self::read_trimmed(&record)? else {
            return Ok(None);
        };
        match contents.parse::<u32>() {
            Ok(pid) => Ok(Some(pid)),
            Err(_) => {
                tracing::debug!(path = %record.display(), %contents, "ignoring unparsable pid record");
                Ok(None)
            }
        }
    }

    fn set_automation_pid(&self, pid: u32) -> Result<(), WallpaperError> {
        let record = self.automation_pid_path();
        write_atomic(&record, pid.to_string().as_bytes())
            .map_err(|err| WallpaperError::io(&record, err))
    }

    fn clear_automation_pid(&self) -> Result<(), WallpaperError> {
        let record = self.automation_pid_path();
        match fs::remove_file(&record) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(WallpaperError::io(&record, err)),
        }
    }
}

/// In-memory state, for embedding the engine without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    current: Mutex<Option<PathBuf>>,
    pid: Mutex<Option<u32>>,
}

impl MemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates a store with a current wallpaper already recorded.
    #[must_use]
    pub fn with_current(path: impl Into<PathBuf>) -> Self {
        Self { current: Mutex::new(Some(path.into())), pid: Mutex::new(None) }
    }
}

impl StateStore for MemoryStateStore {
    fn current_wallpaper(&self) -> Result<Option<PathBuf>, WallpaperError> {
        Ok(self.current.lock().clone())
    }

    fn set_current_wallpaper(&self, path: &Path) -> Result<(), WallpaperError> {
        *self.current.lock() = Some(path.to_path_buf());
        Ok(())
    }

    fn automation_pid(&self) -> Result<Option<u32>, WallpaperError> { Ok(*self.pid.lock()) }

    fn set_automation_pid(&self, pid: u32) -> Result<(), WallpaperError> {
        *self.pid.lock() = Some(pid);
        Ok(())
    }

    fn clear_automation_pid(&self) -> Result<(), WallpaperError> {
        *self.pid.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_store_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path().join("cache"));

        assert!(store.current_wallpaper().unwrap().is_none());
        assert!(store.automation_pid().unwrap().is_none());
    }

    #[test]
    fn test_file_store_current_wallpaper_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path().join("cache"));

        store.set_current_wallpaper(Path::new("/walls/anime/tree.png")).unwrap();

        assert_eq!(
            store.current_wallpaper().unwrap(),
            Some(PathBuf::from("/walls/anime/tree.png"))
        );
        let raw = fs::read_to_string(store.current_wallpaper_path()).unwrap();
        assert_eq!(raw, "/walls/anime/tree.png");
    }

    #[test]
    fn test_file_store_trims_hand_edited_records() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path());
        fs::write(store.current_wallpaper_path(), "/walls/a.png\n").unwrap();
        fs::write(store.automation_pid_path(), " 4242\n").unwrap();

        assert_eq!(store.current_wallpaper().unwrap(), Some(PathBuf::from("/walls/a.png")));
        assert_eq!(store.automation_pid().unwrap(), Some(4242));
    }

    #[test]
    fn test_file_store_unparsable_pid_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path());
        fs::write(store.automation_pid_path(), "not-a-pid").unwrap();

        assert_eq!(store.automation_pid().unwrap(), None);
    }

    #[test]
    fn test_file_store_clear_pid_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStateStore::new(temp_dir.path());

        store.set_automation_pid(1234).unwrap();
        assert_eq!(store.automation_pid().unwrap(), Some(1234));

        store.clear_automation_pid().unwrap();
        store.clear_automation_pid().unwrap();
        assert!(!store.automation_pid_path().exists());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStateStore::with_current("/walls/a.png");
        assert_eq!(store.current_wallpaper().unwrap(), Some(PathBuf::from("/walls/a.png")));

        store.set_automation_pid(7).unwrap();
        assert_eq!(store.automation_pid().unwrap(), Some(7));
        store.clear_automation_pid().unwrap();
        assert_eq!(store.automation_pid().unwrap(), None);
    }
}
