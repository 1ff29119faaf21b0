//! `text-forge epub-meta` command implementation.

use std::path::PathBuf;

use clap::Args;
use tf_config::CliSettings;
use tf_pipeline::{DataDir, Edition, META_TEMPLATE, ToolPaths, write_epub_metadata};

use super::load_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the epub-meta command.
#[derive(Args)]
pub(crate) struct EpubMetaArgs {
    /// Path to mkdocs.yml (default: auto-discover).
    #[arg(short, long, alias = "mkdocs-config")]
    config: Option<PathBuf>,

    /// Metadata template (default: epub/book_meta.yml from the data directory).
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output file.
    #[arg(short, long)]
    out: PathBuf,

    /// Edition line (default: from git tags and history).
    #[arg(long)]
    edition: Option<String>,

    /// Edition date, YYYY-MM-DD (default: last commit date).
    #[arg(long)]
    date: Option<String>,
}

impl EpubMetaArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(self.config.as_deref(), &CliSettings::default())?;

        let template = self.template.or_else(|| {
            DataDir::discover(config.plugin.data_dir.as_deref()).optional(META_TEMPLATE)
        });

        let (edition, date) = match (self.edition, self.date) {
            (Some(edition), Some(date)) => (edition, date),
            (edition, date) => {
                let git = Edition::from_git(&ToolPaths::from_env().git, config.config_dir());
                (
                    edition.unwrap_or_else(|| git.label(&config.locale)),
                    date.unwrap_or_else(|| git.iso_date()),
                )
            }
        };

        write_epub_metadata(&config, template.as_deref(), &self.out, &edition, &date)?;

        output.success(&format!("EPUB metadata written to {}", self.out.display()));
        Ok(())
    }
}
