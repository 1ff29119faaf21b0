//! `text-forge check-i18n` command implementation.

use std::path::PathBuf;

use clap::Args;
use tf_i18n::{CheckOptions, CheckReport, Issue, Layout, check_translations};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check-i18n command.
#[derive(Args)]
pub(crate) struct CheckI18nArgs {
    /// Path to the translations JSON file.
    translations_file: PathBuf,

    /// Directory searched for templates and scripts.
    #[arg(long)]
    base_path: Option<PathBuf>,

    /// Glob of HTML files, relative to the base path.
    #[arg(long, default_value = "**/*.html")]
    html_glob: String,

    /// Glob of JS files, relative to the base path.
    #[arg(long, default_value = "**/*.js")]
    js_glob: String,

    /// Regex of translation keys in t('...') calls.
    #[arg(long, default_value = r"\w+")]
    key_pattern: String,

    /// Generate keys for hardcoded title/placeholder attributes.
    #[arg(long)]
    auto_fix: bool,

    /// Remove unused translation keys.
    #[arg(long)]
    remove_unused: bool,

    /// Show what would be changed without modifying files.
    #[arg(long)]
    dry_run: bool,

    /// Prefix of generated keys.
    #[arg(long, default_value = "auto")]
    key_prefix: String,
}

impl CheckI18nArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let options = CheckOptions {
            base_path: self.base_path,
            html_glob: self.html_glob,
            js_glob: self.js_glob,
            key_pattern: self.key_pattern,
            auto_fix: self.auto_fix,
            remove_unused: self.remove_unused,
            dry_run: self.dry_run,
            key_prefix: self.key_prefix,
        };
        let report = check_translations(&self.translations_file, &options)?;
        print_report(&output, &report, &options);

        if report.passed() {
            Ok(())
        } else {
            Err(CliError::Validation("translation check failed".to_owned()))
        }
    }
}

fn print_report(output: &Output, report: &CheckReport, options: &CheckOptions) {
    for issue in &report.issues {
        if issue.is_error() {
            output.error(&issue.to_string());
        } else {
            output.warning(&issue.to_string());
        }
    }

    match &report.layout {
        Some(Layout::Flat { keys }) => {
            output.success(&format!("Translation file is valid with {keys} keys"));
        }
        Some(Layout::MultiLanguage { languages }) if report.passed() => {
            output.success(&format!(
                "All {} languages have consistent keys",
                languages.len()
            ));
        }
        _ => {}
    }

    if !report.removed.is_empty() {
        if options.dry_run {
            output.info(&format!(
                "[DRY RUN] Would remove {} unused keys",
                report.removed.len()
            ));
        } else {
            output.success(&format!("Removed {} unused keys", report.removed.len()));
        }
    }

    if options.auto_fix && !report.issues.contains(&Issue::AutoFixUnsupported) {
        print_auto_fix(output, report, options.dry_run);
    }
}

fn print_auto_fix(output: &Output, report: &CheckReport, dry_run: bool) {
    if report.hardcoded.is_empty() {
        output.success("No hardcoded strings found");
        return;
    }

    output.step(&format!("Found {} hardcoded strings", report.hardcoded.len()));
    for finding in &report.hardcoded {
        output.info(&format!("  {finding}"));
    }

    if dry_run {
        output.info("[DRY RUN] Would add translation keys and update files");
        return;
    }
    for (key, text) in &report.added {
        output.info(&format!("  + {key}: {text}"));
    }
    for path in &report.updated_files {
        output.success(&format!("Updated {}", path.display()));
    }
    output.success(&format!("Added {} translation keys", report.added.len()));
}
