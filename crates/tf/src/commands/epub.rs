//! `text-forge epub` command implementation.

use std::path::PathBuf;

use clap::Args;
use tf_config::CliSettings;
use tf_pipeline::{EpubArtifacts, EpubBuilder, ToolPaths};

use super::{DEFAULT_BUILD_DIR, load_config, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the epub command.
#[derive(Args)]
pub(crate) struct EpubArgs {
    /// Path to mkdocs.yml (default: auto-discover).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build output directory.
    #[arg(short, long, default_value = DEFAULT_BUILD_DIR)]
    build_dir: PathBuf,

    /// Directory with the Lua filter, EPUB CSS and metadata template (overrides config).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl EpubArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let mut config = load_config(self.config.as_deref(), &CliSettings::default())?;
        if let Some(data_dir) = self.data_dir {
            config.plugin.data_dir = Some(data_dir);
        }

        output.step("Building EPUB");
        let artifacts = EpubBuilder::new(&config, ToolPaths::from_env()).build(&self.build_dir)?;
        print_artifacts(&output, &artifacts);

        output.success(&format!("Success! EPUB: {}", artifacts.epub.display()));
        Ok(())
    }
}

pub(crate) fn print_artifacts(output: &Output, artifacts: &EpubArtifacts) {
    print_warnings(output, &artifacts.warnings);
    output.info(&format!("Combined: {}", artifacts.combined.display()));
    output.info(&format!("Normalized: {}", artifacts.normalized.display()));
    output.info(&format!("Metadata: {}", artifacts.metadata.display()));
}
