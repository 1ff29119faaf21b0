//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check_i18n;
pub(crate) mod combine;
pub(crate) mod epub;
pub(crate) mod epub_meta;
pub(crate) mod info;

use std::path::Path;

use tf_combine::CombineWarning;
use tf_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use check_i18n::CheckI18nArgs;
pub(crate) use combine::CombineArgs;
pub(crate) use epub::EpubArgs;
pub(crate) use epub_meta::EpubMetaArgs;
pub(crate) use info::InfoArgs;

/// Build directory used when `--build-dir` is not given.
const DEFAULT_BUILD_DIR: &str = "build";

/// Load `mkdocs.yml`, explicit or discovered.
fn load_config(path: Option<&Path>, settings: &CliSettings) -> Result<Config, CliError> {
    let config = Config::load(path, Some(settings))?;
    tracing::debug!(
        config = ?config.config_path,
        docs_dir = %config.docs_dir.display(),
        locale = %config.locale,
        "Loaded configuration"
    );
    Ok(config)
}

fn print_warnings(output: &Output, warnings: &[CombineWarning]) {
    for warning in warnings {
        output.warning(&format!("Warning: {warning}"));
    }
}
