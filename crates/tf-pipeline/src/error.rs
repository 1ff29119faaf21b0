//! Pipeline error type.

use std::path::PathBuf;

use tf_combine::CombineError;
use tf_config::ConfigError;

/// Error from a pipeline step.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Chapters could not be combined.
    #[error(transparent)]
    Combine(#[from] CombineError),

    /// File system operation failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A bundled asset is missing from the data directory.
    #[error("Asset not found: {}", .path.display())]
    AssetNotFound {
        /// Expected location.
        path: PathBuf,
    },

    /// An external tool could not be started.
    #[error("Failed to run {tool}: {source}")]
    ToolNotFound {
        /// Tool name.
        tool: String,
        /// Spawn error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("{tool} failed ({status}){}", format_stderr(.stderr))]
    ToolFailed {
        /// Tool name.
        tool: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Metadata template still has placeholders after substitution.
    #[error("Unreplaced placeholders in book metadata: {}", .0.join(", "))]
    UnreplacedPlaceholders(Vec<String>),

    /// A step needs a config file on disk but none was loaded.
    #[error("No mkdocs.yml found; pass --config")]
    NoConfigFile,
}

fn format_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{stderr}")
    }
}

/// Wrap an I/O error with its path.
pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> PipelineError {
    let path = path.into();
    move |source| PipelineError::Io { path, source }
}
