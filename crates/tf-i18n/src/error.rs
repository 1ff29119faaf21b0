//! Checker error type.

use std::path::PathBuf;

/// Error that stops a translation check.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    /// File could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Translations file is not valid JSON.
    #[error("Invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        /// Translations file.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Root value is not an object.
    #[error("Root must be an object")]
    RootNotObject,

    /// A language entry of a multi-language file is not an object.
    #[error("{0}: must be an object")]
    LanguageNotObject(String),

    /// Invalid file glob.
    #[error("Invalid glob {pattern:?}: {source}")]
    Glob {
        /// Pattern as given.
        pattern: String,
        /// Parse error.
        #[source]
        source: glob::PatternError,
    },

    /// Invalid translation key pattern.
    #[error("Invalid key pattern: {0}")]
    KeyPattern(#[from] regex::Error),

    /// Directory walk failure.
    #[error("{0}")]
    Walk(#[from] ignore::Error),
}

/// Wrap an I/O error with its path.
pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> I18nError {
    let path = path.into();
    move |source| I18nError::Io { path, source }
}
