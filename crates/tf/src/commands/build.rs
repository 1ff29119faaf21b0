//! `text-forge build` command implementation.

use std::path::PathBuf;

use clap::Args;
use tf_config::CliSettings;
use tf_pipeline::{SiteOptions, ToolPaths, build_site};

use super::epub::print_artifacts;
use super::{DEFAULT_BUILD_DIR, load_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to mkdocs.yml (default: auto-discover).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build output directory.
    #[arg(short, long, default_value = DEFAULT_BUILD_DIR)]
    build_dir: PathBuf,

    /// Site output directory (default: from mkdocs.yml).
    #[arg(long)]
    site_dir: Option<PathBuf>,

    /// Run mkdocs build with --strict (default: enabled).
    #[arg(long, overrides_with = "no_strict")]
    strict: bool,

    /// Do not fail the site build on MkDocs warnings.
    #[arg(long, overrides_with = "strict")]
    no_strict: bool,

    /// Do not copy the EPUB and combined text to docs/assets.
    #[arg(long)]
    no_copy_artifacts: bool,

    /// Do not write the root redirect page.
    #[arg(long)]
    no_create_redirect: bool,

    /// Redirect target path.
    #[arg(long, default_value = "/ru/")]
    redirect_target: String,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(self.config.as_deref(), &CliSettings::default())?;

        let options = SiteOptions {
            site_dir: self.site_dir.clone(),
            strict: self.resolve_strict(),
            copy_artifacts: !self.no_copy_artifacts,
            create_redirect: !self.no_create_redirect,
            redirect_target: self.redirect_target.clone(),
        };

        output.step("Building EPUB and site");
        let report = build_site(&config, &self.build_dir, &ToolPaths::from_env(), &options)?;

        print_artifacts(&output, &report.artifacts);
        output.info(&format!("EPUB: {}", report.artifacts.epub.display()));
        output.info(&format!("Site: {}", report.site_dir.display()));
        if let Some(redirect) = &report.redirect {
            output.info(&format!("Redirect: {}", redirect.display()));
        }
        output.success("Success! Full build complete.");
        Ok(())
    }

    fn resolve_strict(&self) -> bool {
        self.strict || !self.no_strict
    }
}
