//! `text-forge info` command implementation.

use std::path::PathBuf;

use clap::Args;
use tf_config::CliSettings;
use tf_pipeline::{DataDir, EPUB_CSS, LUA_FILTER, META_TEMPLATE, ToolPaths};

use super::load_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the info command.
#[derive(Args)]
pub(crate) struct InfoArgs {
    /// Path to mkdocs.yml (default: auto-discover).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl InfoArgs {
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(self.config.as_deref(), &CliSettings::default())?;
        let data = DataDir::discover(config.plugin.data_dir.as_deref());
        let tools = ToolPaths::from_env();

        output.info(&format!("text-forge version: {version}"));
        match &config.config_path {
            Some(path) => output.info(&format!("Config: {}", path.display())),
            None => output.warning("Config: no mkdocs.yml found"),
        }
        output.info(&format!("Docs: {}", config.docs_dir.display()));
        output.info(&format!("Locale: {}", config.locale));
        output.info(&format!("Data directory: {}", data.root().display()));
        for asset in [LUA_FILTER, EPUB_CSS, META_TEMPLATE] {
            if data.optional(asset).is_some() {
                output.success(&format!("  {asset}"));
            } else {
                output.warning(&format!("  {asset} (missing)"));
            }
        }
        output.info(&format!("Pandoc: {}", tools.pandoc.display()));
        output.info(&format!("Python: {}", tools.python.display()));
        output.info(&format!("Git: {}", tools.git.display()));
        Ok(())
    }
}
