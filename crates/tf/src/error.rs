//! CLI error types.

use tf_config::ConfigError;
use tf_i18n::I18nError;
use tf_pipeline::PipelineError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    I18n(#[from] I18nError),

    #[error("{0}")]
    Validation(String),
}
