//! Wallpaper discovery and random selection.

use std::fs;
use std::path::{Component, Path, PathBuf};

use natord::compare;
use rand::Rng;

use super::error::WallpaperError;

/// Image extensions accepted for selection (compared case-insensitively).
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Checks if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Recursively collects supported images under `dir`.
fn collect_images(dir: &Path, images: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %dir.display(), error = %err, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            // Skip VCS metadata of a cloned wallpaper repository
            if path.file_name().is_some_and(|name| name == ".git") {
                continue;
            }
            collect_images(&path, images);
        } else if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }
}

/// Picks wallpapers from a directory tree.
#[derive(Debug, Clone)]
pub struct Selector {
    root: PathBuf,
}

impl Selector {
    /// Creates a selector over the wallpaper directory `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// Returns the wallpaper directory.
    #[must_use]
    pub fn root(&self) -> &Path { &self.root }

    /// Resolves the selection root for an optional category.
    ///
    /// An empty category means the whole wallpaper directory. Categories are
    /// relative paths below the root; `..` and absolute paths are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the category escapes the root or the resolved
    /// directory does not exist.
    pub fn category_root(&self, category: Option<&str>) -> Result<PathBuf, WallpaperError> {
        match category.filter(|name| !name.is_empty()) {
            Some(name) => {
                let dir = self.root.join(name);
                if is_relative_category(name) && dir.is_dir() {
                    Ok(dir)
                } else {
                    Err(WallpaperError::CategoryNotFound(name.to_string()))
                }
            }
            None if self.root.is_dir() => Ok(self.root.clone()),
            None => Err(WallpaperError::DirectoryNotFound(self.root.clone())),
        }
    }

    /// Lists every eligible image under the selection root in natural order.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection root does not exist.
    pub fn list(&self, category: Option<&str>) -> Result<Vec<PathBuf>, WallpaperError> {
        let dir = self.category_root(category)?;
        let mut images = Vec::new();
        collect_images(&dir, &mut images);
        images.sort_by(|a, b| compare(a.to_string_lossy().as_ref(), b.to_string_lossy().as_ref()));
        Ok(images)
    }

    /// Picks one eligible image uniformly at random.
    ///
    /// Consecutive picks may repeat.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection root does not exist or holds no images.
    pub fn select(&self, category: Option<&str>) -> Result<PathBuf, WallpaperError> {
        let dir = self.category_root(category)?;
        let mut images = self.list(category)?;
        if images.is_empty() {
            return Err(WallpaperError::NoImages(dir));
        }

        let index = rand::rng().random_range(0..images.len());
        let picked = images.swap_remove(index);
        tracing::debug!(path = %picked.display(), candidates = images.len() + 1, "selected wallpaper");
        Ok(picked)
    }
}

/// Returns `true` if `name` only descends below the directory it is joined to.
fn is_relative_category(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("a.JPG")));
        assert!(is_supported_image(Path::new("a.Jpeg")));
        assert!(!is_supported_image(Path::new("a.gif")));
        assert!(!is_supported_image(Path::new("a.txt")));
        assert!(!is_supported_image(Path::new("png")));
    }

    #[test]
    fn test_select_only_returns_images() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("space/a.png"));
        touch(&temp_dir.path().join("space/b.txt"));
        let selector = Selector::new(temp_dir.path());

        for _ in 0..20 {
            let picked = selector.select(Some("space")).unwrap();
            assert_eq!(picked, temp_dir.path().join("space/a.png"));
        }
    }

    #[test]
    fn test_list_is_recursive_and_naturally_sorted() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("wall10.png"));
        touch(&temp_dir.path().join("wall2.png"));
        touch(&temp_dir.path().join("nature/deep/tree.jpeg"));
        touch(&temp_dir.path().join(".git/objects/blob.png"));
        let selector = Selector::new(temp_dir.path());

        let names: Vec<_> = selector
            .list(None)
            .unwrap()
            .into_iter()
            .map(|path| path.strip_prefix(temp_dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("nature/deep/tree.jpeg"),
                PathBuf::from("wall2.png"),
                PathBuf::from("wall10.png"),
            ]
        );
    }

    #[test]
    fn test_missing_category_is_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let selector = Selector::new(temp_dir.path());

        let err = selector.select(Some("space")).unwrap_err();
        assert!(matches!(err, WallpaperError::CategoryNotFound(ref name) if name == "space"));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_missing_root_is_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let selector = Selector::new(temp_dir.path().join("missing"));

        assert!(matches!(selector.select(None), Err(WallpaperError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_empty_directory_has_no_images() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("notes.txt"));
        let selector = Selector::new(temp_dir.path());

        assert!(matches!(selector.select(None), Err(WallpaperError::NoImages(_))));
    }

    #[test]
    fn test_empty_category_means_whole_tree() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("a.png"));
        let selector = Selector::new(temp_dir.path());

        assert_eq!(selector.select(Some("")).unwrap(), temp_dir.path().join("a.png"));
    }

    #[test]
    fn test_category_cannot_escape_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("walls");
        touch(&root.join("nature/a.png"));
        touch(&temp_dir.path().join("outside/b.png"));
        let selector = Selector::new(&root);

        for category in ["..", "../outside", "nature/../../outside", "/etc"] {
            let err = selector.select(Some(category)).unwrap_err();
            assert!(
                matches!(err, WallpaperError::CategoryNotFound(ref name) if name == category),
                "{category} resolved outside the root"
            );
        }
    }

    #[test]
    fn test_nested_category_is_allowed() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("nature/deep/tree.png"));
        let selector = Selector::new(temp_dir.path());

        assert_eq!(
            selector.select(Some("nature/deep")).unwrap(),
            temp_dir.path().join("nature/deep/tree.png")
        );
    }
}
