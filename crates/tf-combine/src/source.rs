//! Chapter source abstraction.
//!
//! All path parameters are **docs-relative paths** with forward slashes
//! (e.g. `"index.md"`, `"part1/chapter1.md"`), the same form used in the
//! site navigation.

use std::path::{Path, PathBuf};

/// Error returned by a [`ChapterSource`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The requested path does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O failure while reading or listing.
    #[error("{source} (path: {})", .path.display())]
    Io {
        /// Filesystem path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Directory walk failure.
    #[error("{0}")]
    Walk(#[from] ignore::Error),
}

/// Read-only access to chapter files.
pub trait ChapterSource {
    /// Check whether a chapter file exists.
    fn exists(&self, path: &str) -> bool;

    /// Read a chapter's full text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file is missing or unreadable.
    fn read(&self, path: &str) -> Result<String, SourceError>;

    /// List all markdown files, in the order used when no navigation is configured.
    ///
    /// Files sort by path segments with `index.md` first in its directory.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the listing fails.
    fn list(&self) -> Result<Vec<String>, SourceError>;
}

/// Filesystem-backed chapter source rooted at the docs directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl ChapterSource for FsSource {
    fn exists(&self, path: &str) -> bool {
        self.full_path(path).is_file()
    }

    fn read(&self, path: &str) -> Result<String, SourceError> {
        let full = self.full_path(path);
        std::fs::read_to_string(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(path.to_owned())
            } else {
                SourceError::Io {
                    path: full,
                    source: e,
                }
            }
        })
    }

    fn list(&self) -> Result<Vec<String>, SourceError> {
        let mut paths = Vec::new();
        if !self.root.is_dir() {
            return Ok(paths);
        }

        for entry in ignore::WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(false)
            .build()
        {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            if let Ok(rel) = path.strip_prefix(&self.root) {
                paths.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }

        sort_for_navigation(&mut paths);
        Ok(paths)
    }
}

/// Sort docs-relative paths the way a missing navigation is ordered.
pub(crate) fn sort_for_navigation(paths: &mut [String]) {
    paths.sort_by_cached_key(|path| {
        let mut segments: Vec<String> = path.split('/').map(str::to_lowercase).collect();
        if let Some(last) = segments.last_mut()
            && last == "index.md"
        {
            last.clear();
        }
        segments
    });
}
