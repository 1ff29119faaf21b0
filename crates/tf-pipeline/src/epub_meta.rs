//! EPUB metadata file from a placeholder template.
//!
//! The template contains `[title]`, `[subtitle]`, `[author]`, `[identifier]`,
//! `[publisher]`, `[rights]`, `[edition]` and `[date]`. Values come from the
//! `text-forge` plugin options with site-level fallbacks.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tf_config::Config;

use crate::error::{PipelineError, io_error};

/// Template used when the data directory has no `epub/book_meta.yml`.
pub const DEFAULT_TEMPLATE: &str = r"---
title:
  - type: main
    text: |-
      [title]
  - type: subtitle
    text: |-
      [subtitle]
creator:
  - role: author
    text: |-
      [author]
identifier:
  - scheme: URI
    text: |-
      [identifier]
publisher: |-
  [publisher]
rights: |-
  [rights]
date: '[date]'
edition: |-
  [edition]
...
";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[a-z_]+\]").expect("valid placeholder regex"));

/// Values substituted into the metadata template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookMeta {
    /// Book title.
    pub title: String,
    /// Subtitle, possibly empty.
    pub subtitle: String,
    /// Author, possibly empty.
    pub author: String,
    /// Unique identifier.
    pub identifier: String,
    /// Publisher.
    pub publisher: String,
    /// Rights statement, possibly empty.
    pub rights: String,
}

impl BookMeta {
    /// Collect values from the site configuration.
    ///
    /// | Field      | Sources, first non-empty wins                              |
    /// |------------|------------------------------------------------------------|
    /// | title      | `epub_title`, `site_name`, `Book`                          |
    /// | subtitle   | `epub_subtitle`, `site_description`                        |
    /// | author     | `epub_author`, `site_author`                               |
    /// | identifier | `epub_identifier`, `site_url`, `urn:book`                  |
    /// | publisher  | `epub_publisher`, `site_author`, `Publisher`               |
    /// | rights     | `epub_rights`, `copyright`, link to `site_url`             |
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let plugin = &config.plugin;
        let site_url = first(&[config.site_url.as_deref()]);

        let rights = first(&[plugin.epub_rights.as_deref(), config.copyright.as_deref()])
            .or_else(|| {
                site_url
                    .as_deref()
                    .map(|url| format!(r#"<a href="{url}">{url}</a>"#))
            })
            .unwrap_or_default();

        Self {
            title: first(&[plugin.epub_title.as_deref(), config.site_name.as_deref()])
                .unwrap_or_else(|| "Book".to_owned()),
            subtitle: first(&[
                plugin.epub_subtitle.as_deref(),
                config.site_description.as_deref(),
            ])
            .unwrap_or_default(),
            author: first(&[plugin.epub_author.as_deref(), config.site_author.as_deref()])
                .unwrap_or_default(),
            identifier: first(&[plugin.epub_identifier.as_deref(), site_url.as_deref()])
                .unwrap_or_else(|| "urn:book".to_owned()),
            publisher: first(&[
                plugin.epub_publisher.as_deref(),
                config.site_author.as_deref(),
            ])
            .unwrap_or_else(|| "Publisher".to_owned()),
            rights,
        }
    }

    /// Substitute all placeholders into `template`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnreplacedPlaceholders`] if the result still
    /// contains `[lowercase_words]`.
    pub fn render(&self, template: &str, edition: &str, date: &str) -> Result<String, PipelineError> {
        let replacements = [
            ("[title]", self.title.as_str()),
            ("[subtitle]", self.subtitle.as_str()),
            ("[author]", self.author.as_str()),
            ("[identifier]", self.identifier.as_str()),
            ("[publisher]", self.publisher.as_str()),
            ("[rights]", self.rights.as_str()),
            ("[edition]", edition),
            ("[date]", date),
        ];

        let mut text = template.to_owned();
        for (placeholder, value) in replacements {
            text = text.replace(placeholder, value);
        }

        let mut leftovers: Vec<String> = PLACEHOLDER
            .find_iter(&text)
            .map(|m| m.as_str().to_owned())
            .collect();
        if !leftovers.is_empty() {
            leftovers.sort();
            leftovers.dedup();
            return Err(PipelineError::UnreplacedPlaceholders(leftovers));
        }
        Ok(text)
    }
}

/// Render the metadata file for `config` and write it to `out`.
///
/// `template` defaults to [`DEFAULT_TEMPLATE`].
///
/// # Errors
///
/// Returns error if the template cannot be read, placeholders remain, or the
/// output cannot be written.
pub fn write_epub_metadata(
    config: &Config,
    template: Option<&Path>,
    out: &Path,
    edition: &str,
    date: &str,
) -> Result<(), PipelineError> {
    let template_text = match template {
        Some(path) => std::fs::read_to_string(path).map_err(io_error(path))?,
        None => DEFAULT_TEMPLATE.to_owned(),
    };

    let text = BookMeta::from_config(config).render(&template_text, edition, date)?;

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    std::fs::write(out, text).map_err(io_error(out))?;
    tracing::info!(path = %out.display(), "Wrote EPUB metadata");
    Ok(())
}

/// First present, non-blank value, trimmed.
fn first(values: &[Option<&str>]) -> Option<String> {
    values
        .iter()
        .flatten()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_owned)
}
