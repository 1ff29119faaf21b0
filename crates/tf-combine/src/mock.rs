//! Mock chapter source for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use std::collections::HashMap;

use crate::source::{ChapterSource, SourceError, sort_for_navigation};

/// In-memory chapter source.
///
/// # Example
///
/// ```ignore
/// use tf_combine::{ChapterSource, MockSource};
///
/// let source = MockSource::new()
///     .with_chapter("index.md", "# Home")
///     .with_chapter("chapter1.md", "# Chapter 1");
///
/// assert!(source.exists("chapter1.md"));
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    chapters: HashMap<String, String>,
}

impl MockSource {
    /// Create an empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chapter with the given docs-relative path and content.
    #[must_use]
    pub fn with_chapter(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.chapters.insert(path.into(), content.into());
        self
    }
}

impl ChapterSource for MockSource {
    fn exists(&self, path: &str) -> bool {
        self.chapters.contains_key(path)
    }

    fn read(&self, path: &str) -> Result<String, SourceError> {
        self.chapters
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_owned()))
    }

    fn list(&self) -> Result<Vec<String>, SourceError> {
        let mut paths: Vec<String> = self
            .chapters
            .keys()
            .filter(|p| p.ends_with(".md"))
            .cloned()
            .collect();
        sort_for_navigation(&mut paths);
        Ok(paths)
    }
}
