//! Configuration loading for text-forge.
//!
//! Reads an MkDocs `mkdocs.yml` and extracts what the book pipeline needs:
//! site metadata, `docs_dir`/`site_dir`, the raw `nav` tree, the locale and
//! the `text-forge` plugin section. Config files are auto-discovered in
//! parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## YAML tags
//!
//! `!ENV VAR` and `!ENV [VAR1, VAR2, default]` are resolved against the
//! process environment. Other tags are replaced by their inner value.
//!
//! ## Environment Variable Expansion
//!
//! String values of the plugin section support:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod env_tag;
mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mkdocs.yml";

/// Plugin name under `plugins:`.
const PLUGIN_NAME: &str = "text-forge";

/// Locale used when neither the plugin nor the theme sets one.
const DEFAULT_LOCALE: &str = "en";

/// Site output directory when `site_dir` is not set.
const DEFAULT_SITE_DIR: &str = "public";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs directory.
    pub docs_dir: Option<PathBuf>,
    /// Override site output directory.
    pub site_dir: Option<PathBuf>,
    /// Override locale.
    pub locale: Option<String>,
}

/// Loaded site configuration.
#[derive(Debug)]
pub struct Config {
    /// `site_name`.
    pub site_name: Option<String>,
    /// `site_description`.
    pub site_description: Option<String>,
    /// `site_author`.
    pub site_author: Option<String>,
    /// `site_url`.
    pub site_url: Option<String>,
    /// `copyright`.
    pub copyright: Option<String>,
    /// Markdown sources, absolute or relative to the working directory.
    pub docs_dir: PathBuf,
    /// Site output directory.
    pub site_dir: PathBuf,
    /// Raw `nav` value, parsed later into a navigation tree.
    pub nav: Option<Value>,
    /// Resolved locale.
    pub locale: String,
    /// `text-forge` plugin options.
    pub plugin: PluginConfig,
    /// Path to the config file (set after loading).
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Options of the `text-forge` plugin section.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PluginConfig {
    /// EPUB title.
    pub epub_title: Option<String>,
    /// EPUB subtitle.
    pub epub_subtitle: Option<String>,
    /// EPUB author.
    pub epub_author: Option<String>,
    /// EPUB identifier.
    pub epub_identifier: Option<String>,
    /// EPUB publisher.
    pub epub_publisher: Option<String>,
    /// EPUB rights statement.
    pub epub_rights: Option<String>,
    /// Locale for chapter labels and dates.
    pub locale: Option<String>,
    /// Label for the chapter creation date.
    pub chapter_created_label: Option<String>,
    /// Label for the chapter publication date.
    pub chapter_published_label: Option<String>,
    /// Date format for chapter dates.
    pub date_format: Option<String>,
    /// Directory holding pipeline assets (Lua filter, EPUB CSS, metadata template).
    pub data_dir: Option<PathBuf>,
}

/// Raw `mkdocs.yml` fields as parsed from YAML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    site_name: Option<String>,
    site_description: Option<String>,
    site_author: Option<String>,
    site_url: Option<String>,
    copyright: Option<String>,
    docs_dir: Option<String>,
    site_dir: Option<String>,
    nav: Option<Value>,
    theme: Option<Value>,
    plugins: Option<Value>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`plugins.text-forge.epub_title`").
        field: String,
        /// Error message (e.g., "${`BOOK_TITLE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mkdocs.yml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration text, resolving paths against `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the YAML is invalid, a `${VAR}` is unset, or
    /// validation fails.
    pub fn from_yaml(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut value: Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            value = Value::Mapping(serde_yaml::Mapping::new());
        }
        env_tag::resolve_tags(&mut value);

        let raw: RawConfig = serde_yaml::from_value(value)?;
        let mut plugin = extract_plugin(raw.plugins.as_ref())?;
        expand_plugin(&mut plugin)?;

        if let Some(docs_dir) = &raw.docs_dir {
            require_non_empty(docs_dir, "docs_dir")?;
        }

        let locale = plugin
            .locale
            .clone()
            .or_else(|| theme_language(raw.theme.as_ref()))
            .unwrap_or_else(|| DEFAULT_LOCALE.to_owned());

        let mut config = Self {
            site_name: raw.site_name,
            site_description: raw.site_description,
            site_author: raw.site_author,
            site_url: raw.site_url,
            copyright: raw.copyright,
            docs_dir: PathBuf::from(raw.docs_dir.as_deref().unwrap_or("docs")),
            site_dir: PathBuf::from(raw.site_dir.as_deref().unwrap_or(DEFAULT_SITE_DIR)),
            nav: raw.nav,
            locale,
            plugin,
            config_path: None,
        };
        config.resolve_paths(config_dir);
        config.validate()?;
        Ok(config)
    }

    /// Directory containing the config file, or `.` without one.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.locale, "locale")?;
        if let Some(format) = &self.plugin.date_format {
            require_non_empty(format, "plugins.text-forge.date_format")?;
        }
        Ok(())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(docs_dir) = &settings.docs_dir {
            self.docs_dir.clone_from(docs_dir);
        }
        if let Some(site_dir) = &settings.site_dir {
            self.site_dir.clone_from(site_dir);
        }
        if let Some(locale) = &settings.locale {
            self.locale.clone_from(locale);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site_name: None,
            site_description: None,
            site_author: None,
            site_url: None,
            copyright: None,
            docs_dir: base.join("docs"),
            site_dir: base.join(DEFAULT_SITE_DIR),
            nav: None,
            locale: DEFAULT_LOCALE.to_owned(),
            plugin: PluginConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_yaml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_dir = config_dir.join(&self.docs_dir);
        self.site_dir = config_dir.join(&self.site_dir);
        if let Some(data_dir) = &self.plugin.data_dir {
            self.plugin.data_dir = Some(config_dir.join(data_dir));
        }
    }
}

/// Find the `text-forge` entry in `plugins`, either list or mapping form.
fn extract_plugin(plugins: Option<&Value>) -> Result<PluginConfig, ConfigError> {
    let options = match plugins {
        Some(Value::Sequence(items)) => items.iter().find_map(|item| match item {
            Value::Mapping(map) => map.get(PLUGIN_NAME),
            _ => None,
        }),
        Some(Value::Mapping(map)) => map.get(PLUGIN_NAME),
        _ => None,
    };

    match options {
        Some(value) if !value.is_null() => Ok(serde_yaml::from_value(value.clone())?),
        _ => Ok(PluginConfig::default()),
    }
}

fn expand_plugin(plugin: &mut PluginConfig) -> Result<(), ConfigError> {
    let fields = [
        (&mut plugin.epub_title, "epub_title"),
        (&mut plugin.epub_subtitle, "epub_subtitle"),
        (&mut plugin.epub_author, "epub_author"),
        (&mut plugin.epub_identifier, "epub_identifier"),
        (&mut plugin.epub_publisher, "epub_publisher"),
        (&mut plugin.epub_rights, "epub_rights"),
        (&mut plugin.locale, "locale"),
        (&mut plugin.chapter_created_label, "chapter_created_label"),
        (&mut plugin.chapter_published_label, "chapter_published_label"),
        (&mut plugin.date_format, "date_format"),
    ];
    for (value, name) in fields {
        expand::expand_field(value, &format!("plugins.{PLUGIN_NAME}.{name}"))?;
    }
    Ok(())
}

fn theme_language(theme: Option<&Value>) -> Option<String> {
    theme?
        .get("language")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
