//! Combining the chapters of a configured site.

use std::path::Path;

use tf_combine::{CombineOptions, CombinedDocument, Combiner, DateLabels, FsSource, parse_nav};
use tf_config::Config;

use crate::error::PipelineError;

/// Combine options derived from the site configuration.
///
/// Locale defaults are applied first, then plugin label and format overrides.
#[must_use]
pub fn combine_options(config: &Config) -> CombineOptions {
    let mut labels = DateLabels::for_locale(&config.locale);
    let plugin = &config.plugin;
    if let Some(label) = &plugin.chapter_created_label {
        labels.created.clone_from(label);
    }
    if let Some(label) = &plugin.chapter_published_label {
        labels.published.clone_from(label);
    }
    if let Some(format) = &plugin.date_format {
        labels.date_format.clone_from(format);
    }
    CombineOptions { labels }
}

/// Combine the chapters of `config` in navigation order.
///
/// # Errors
///
/// Returns error if the navigation is malformed or a chapter is missing or
/// unreadable.
pub fn combine_book(config: &Config) -> Result<CombinedDocument, PipelineError> {
    let nav = config.nav.as_ref().map(parse_nav).transpose()?;
    let source = FsSource::new(config.docs_dir.clone());

    tracing::info!(docs_dir = %config.docs_dir.display(), "Combining chapters");
    let document = Combiner::new(&source, combine_options(config)).combine(nav.as_deref())?;
    Ok(document)
}

/// Combine the chapters of `config` and write them to `output`.
///
/// # Errors
///
/// Returns error if combining or writing fails.
pub fn combine_to_file(config: &Config, output: &Path) -> Result<CombinedDocument, PipelineError> {
    let document = combine_book(config)?;
    document.write_to(output)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn project(mkdocs: &str) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        let config = Config::from_yaml(mkdocs, dir.path()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_combine_options_from_locale() {
        let (_dir, config) = project("theme:\n  language: ru\n");
        let options = combine_options(&config);
        assert_eq!(options.labels, DateLabels::for_locale("ru"));
    }

    #[test]
    fn test_combine_options_plugin_overrides() {
        let (_dir, config) = project(
            "plugins:\n  - text-forge:\n      chapter_created_label: Written\n      date_format: '%d/%m/%Y'\n",
        );
        let options = combine_options(&config);

        assert_eq!(options.labels.created, "Written");
        assert_eq!(options.labels.published, "Published");
        assert_eq!(options.labels.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_combine_book_uses_nav() {
        let (dir, config) = project("nav:\n  - Second: b.md\n  - First: a.md\n");
        fs::write(dir.path().join("docs/a.md"), "A text").unwrap();
        fs::write(dir.path().join("docs/b.md"), "See [a](a.md)").unwrap();

        let document = combine_book(&config).unwrap();

        assert_eq!(
            document.text,
            "# Second {#b-md}\n\nSee [a](#a-md)\n\n# First {#a-md}\n\nA text\n"
        );
    }

    #[test]
    fn test_combine_book_without_nav_lists_docs() {
        let (dir, config) = project("");
        fs::write(dir.path().join("docs/index.md"), "# Home").unwrap();

        let document = combine_book(&config).unwrap();

        assert_eq!(document.text, "# Home {#index-md}\n");
    }

    #[test]
    fn test_malformed_nav_is_error() {
        let (_dir, config) = project("nav: index.md\n");
        let err = combine_book(&config).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Combine(tf_combine::CombineError::MalformedNavigation(_))
        ));
    }

    #[test]
    fn test_combine_to_file() {
        let (dir, config) = project("");
        fs::write(dir.path().join("docs/index.md"), "# Home").unwrap();
        let out = dir.path().join("build/text_combined.txt");

        combine_to_file(&config, &out).unwrap();

        assert_eq!(fs::read_to_string(out).unwrap(), "# Home {#index-md}\n");
    }
}
