//! text-forge CLI - book and site builder for MkDocs text projects.
//!
//! Provides commands for:
//! - `combine`: Combine chapters into one manuscript
//! - `epub`: Build the EPUB
//! - `build`: Build the EPUB and the MkDocs site
//! - `epub-meta`: Render EPUB metadata from a template
//! - `check-i18n`: Check a translations file
//! - `info`: Show version and data directory

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckI18nArgs, CombineArgs, EpubArgs, EpubMetaArgs, InfoArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// text-forge - MkDocs plugin and build tools for text projects.
#[derive(Parser)]
#[command(name = "text-forge", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine markdown chapters in navigation order.
    Combine(CombineArgs),
    /// Build the EPUB.
    Epub(EpubArgs),
    /// Build the EPUB and the site.
    Build(BuildArgs),
    /// Render EPUB metadata from a template.
    EpubMeta(EpubMetaArgs),
    /// Check a translations file for consistency.
    CheckI18n(CheckI18nArgs),
    /// Show text-forge version and data directory.
    Info(InfoArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG.
    // Combine warnings are printed by the commands themselves.
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Combine(args) => args.execute(),
        Commands::Epub(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::EpubMeta(args) => args.execute(),
        Commands::CheckI18n(args) => args.execute(),
        Commands::Info(args) => args.execute(VERSION),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["text-forge", "combine", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Combine(_)));
    }

    #[test]
    fn test_check_i18n_requires_file() {
        assert!(Cli::try_parse_from(["text-forge", "check-i18n"]).is_err());
    }
}
