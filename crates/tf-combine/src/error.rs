//! Error and warning types for chapter combination.
//!
//! Structural problems ([`CombineError`]) abort the run before anything is
//! written. Content anomalies ([`CombineWarning`]) are collected alongside a
//! complete output.

use std::path::PathBuf;

use crate::source::SourceError;

/// Fatal combination error.
#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    /// Navigation references a file that does not exist.
    #[error("Chapter file not found: {path}")]
    MissingChapterFile {
        /// Docs-relative path from the navigation.
        path: String,
    },

    /// Navigation has an entry that is neither a path, a titled path, nor a section.
    #[error("Malformed navigation: {0}")]
    MalformedNavigation(String),

    /// Navigation resolved to zero chapters.
    #[error("Navigation contains no chapters")]
    NoChapters,

    /// Reading a chapter (or listing the source) failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Docs-relative path being read.
        path: String,
        /// Underlying source error.
        #[source]
        source: SourceError,
    },

    /// Writing the combined document failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Output file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable anomaly reported alongside a complete combined document.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombineWarning {
    /// Front matter block exists but is not valid YAML for the expected fields.
    #[error("{path}: ignoring malformed front matter: {message}")]
    MalformedFrontMatter {
        /// Chapter path.
        path: String,
        /// Parser message.
        message: String,
    },

    /// A `created`/`published` value is not a `YYYY-MM-DD` date.
    #[error("{path}: ignoring malformed {field} date {value:?}")]
    MalformedFrontMatterDate {
        /// Chapter path.
        path: String,
        /// Front matter field name.
        field: &'static str,
        /// Raw value as written.
        value: String,
    },

    /// A link to a markdown file that is not part of the navigation.
    #[error("{chapter}: link target {target} is not a combined chapter")]
    UnresolvedLink {
        /// Chapter containing the link.
        chapter: String,
        /// Link target as written.
        target: String,
    },

    /// A link to a combined chapter whose destination could not be located
    /// in the source text, left unchanged.
    #[error("{chapter}: link to {target} could not be rewritten")]
    LinkNotRewritten {
        /// Chapter containing the link.
        chapter: String,
        /// Link target as parsed.
        target: String,
    },

    /// A front matter `anchor` that cannot be used as an element id.
    #[error("{path}: anchor {anchor:?} is not a valid id, using {replacement:?}")]
    InvalidAnchor {
        /// Chapter path.
        path: String,
        /// Anchor as written.
        anchor: String,
        /// Slug used instead.
        replacement: String,
    },

    /// The same file is listed more than once in the navigation.
    #[error("{path}: listed more than once in navigation, keeping first occurrence")]
    DuplicateNavEntry {
        /// Chapter path.
        path: String,
    },
}

/// Log a warning and record it.
pub(crate) fn report(warnings: &mut Vec<CombineWarning>, warning: CombineWarning) {
    tracing::warn!("{warning}");
    warnings.push(warning);
}
