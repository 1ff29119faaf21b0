//! Location of bundled pipeline assets.
//!
//! The data directory holds the files the pipeline passes to Pandoc:
//!
//! ```text
//! share/text-forge/
//! ├── scripts/pymdown-pandoc.lua
//! └── epub/
//!     ├── epub.css
//!     └── book_meta.yml
//! ```

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Environment variable pointing at the data directory.
pub const DATA_DIR_ENV: &str = "TEXT_FORGE_DATA_DIR";

/// Lua filter turning pymdown blocks into Pandoc fenced divs.
pub const LUA_FILTER: &str = "scripts/pymdown-pandoc.lua";
/// Stylesheet embedded into the EPUB.
pub const EPUB_CSS: &str = "epub/epub.css";
/// EPUB metadata template.
pub const META_TEMPLATE: &str = "epub/book_meta.yml";

const SHARE_SUBDIR: &str = "share/text-forge";

/// Resolved data directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Use `root` as the data directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the data directory.
    ///
    /// Tried in order: `configured` (plugin `data_dir`), `TEXT_FORGE_DATA_DIR`,
    /// `<exe>/../share/text-forge`, `./share/text-forge`. The first existing
    /// directory wins; without one, the last candidate is returned so that
    /// asset lookups report a concrete path.
    #[must_use]
    pub fn discover(configured: Option<&Path>) -> Self {
        let candidates = Self::candidates(configured);
        let root = candidates
            .iter()
            .find(|dir| dir.is_dir())
            .or(candidates.last())
            .cloned()
            .unwrap_or_else(|| PathBuf::from(SHARE_SUBDIR));
        tracing::debug!(path = %root.display(), "Using data directory");
        Self { root }
    }

    fn candidates(configured: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(dir) = configured {
            candidates.push(dir.to_path_buf());
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            candidates.push(PathBuf::from(dir));
        }
        if let Ok(exe) = std::env::current_exe()
            && let Some(prefix) = exe.parent().and_then(Path::parent)
        {
            candidates.push(prefix.join(SHARE_SUBDIR));
        }
        candidates.push(PathBuf::from(SHARE_SUBDIR));
        candidates
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of an asset that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AssetNotFound`] if the file is missing.
    pub fn require(&self, relative: &str) -> Result<PathBuf, PipelineError> {
        self.optional(relative)
            .ok_or_else(|| PipelineError::AssetNotFound {
                path: self.root.join(relative),
            })
    }

    /// Path of an asset, if present.
    #[must_use]
    pub fn optional(&self, relative: &str) -> Option<PathBuf> {
        let path = self.root.join(relative);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_configured_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::discover(Some(dir.path()));
        assert_eq!(data.root(), dir.path());
    }

    #[test]
    fn test_missing_configured_dir_is_skipped() {
        let data = DataDir::discover(Some(Path::new("/nonexistent/text-forge-data")));
        assert_ne!(data.root(), Path::new("/nonexistent/text-forge-data"));
    }

    #[test]
    fn test_require_existing_asset() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("scripts")).unwrap();
        fs::write(dir.path().join(LUA_FILTER), "-- filter").unwrap();

        let data = DataDir::new(dir.path());

        assert_eq!(data.require(LUA_FILTER).unwrap(), dir.path().join(LUA_FILTER));
    }

    #[test]
    fn test_require_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::new(dir.path());

        let err = data.require(EPUB_CSS).unwrap_err();

        assert!(matches!(err, PipelineError::AssetNotFound { ref path } if path.ends_with("epub/epub.css")));
        assert!(data.optional(META_TEMPLATE).is_none());
    }
}
