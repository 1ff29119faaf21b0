//! `text-forge combine` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use tf_combine::default_output;
use tf_config::CliSettings;
use tf_pipeline::combine_to_file;

use super::{DEFAULT_BUILD_DIR, load_config, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the combine command.
#[derive(Args)]
pub(crate) struct CombineArgs {
    /// Path to mkdocs.yml (default: auto-discover).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (default: build/text_combined.txt).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Locale of chapter date labels (overrides config).
    #[arg(long)]
    locale: Option<String>,
}

impl CombineArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let settings = CliSettings {
            docs_dir: self.docs_dir,
            locale: self.locale,
            ..CliSettings::default()
        };
        let config = load_config(self.config.as_deref(), &settings)?;
        let out_file = self
            .output
            .unwrap_or_else(|| default_output(Path::new(DEFAULT_BUILD_DIR)));

        output.info(&format!("Docs: {}", config.docs_dir.display()));
        let document = combine_to_file(&config, &out_file)?;
        print_warnings(&output, &document.warnings);

        output.success(&format!(
            "Combined {} chapters into {}",
            document.chapters.len(),
            out_file.display()
        ));
        Ok(())
    }
}
