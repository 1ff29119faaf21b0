//! Translation file check.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{I18nError, io_error};
use crate::hardcoded::{HardcodedString, annotate_files, assign_keys, find_hardcoded_strings};
use crate::scan::KeyScanner;

/// Options of [`check_translations`].
#[derive(Clone, Debug)]
pub struct CheckOptions {
    /// Directory searched for templates and scripts. Without it, flat files
    /// are only validated as JSON.
    pub base_path: Option<PathBuf>,
    /// Glob of HTML templates, relative to `base_path`.
    pub html_glob: String,
    /// Glob of JS files, relative to `base_path`.
    pub js_glob: String,
    /// Regex of keys accepted in `t('...')` calls.
    pub key_pattern: String,
    /// Generate keys for hardcoded attributes and annotate templates.
    pub auto_fix: bool,
    /// Drop unused keys from the translations file.
    pub remove_unused: bool,
    /// Report changes without writing files.
    pub dry_run: bool,
    /// Prefix of generated keys.
    pub key_prefix: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            base_path: None,
            html_glob: "**/*.html".to_owned(),
            js_glob: "**/*.js".to_owned(),
            key_pattern: r"\w+".to_owned(),
            auto_fix: false,
            remove_unused: false,
            dry_run: false,
            key_prefix: "auto".to_owned(),
        }
    }
}

/// Shape of a translations file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `{key: text}`.
    Flat {
        /// Number of keys.
        keys: usize,
    },
    /// `{lang: {key: text}}`, compared against the first language.
    MultiLanguage {
        /// Languages in file order.
        languages: Vec<String>,
    },
}

/// Problem found by a check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Issue {
    /// Translations file does not exist.
    FileMissing(PathBuf),
    /// A language lacks keys of the reference language.
    MissingLanguageKeys {
        /// Language code.
        lang: String,
        /// Missing keys, sorted.
        keys: Vec<String>,
    },
    /// A language has keys the reference language lacks.
    ExtraLanguageKeys {
        /// Language code.
        lang: String,
        /// Extra keys, sorted.
        keys: Vec<String>,
    },
    /// Keys used in templates or scripts but not defined.
    UndefinedKeys(Vec<String>),
    /// Keys defined but not used anywhere.
    UnusedKeys(Vec<String>),
    /// Auto-fix was requested on a multi-language file.
    AutoFixUnsupported,
}

impl Issue {
    /// Whether the issue fails the check.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::MissingLanguageKeys { .. } | Self::UndefinedKeys(_)
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileMissing(path) => {
                write!(f, "No translations file found at {}", path.display())
            }
            Self::MissingLanguageKeys { lang, keys } => {
                write!(f, "{lang}: missing keys: {}", keys.join(", "))
            }
            Self::ExtraLanguageKeys { lang, keys } => {
                write!(f, "{lang}: extra keys: {}", keys.join(", "))
            }
            Self::UndefinedKeys(keys) => write!(
                f,
                "Missing translations for keys used in code: {}",
                keys.join(", ")
            ),
            Self::UnusedKeys(keys) => {
                write!(f, "Unused translation keys: {}", keys.join(", "))
            }
            Self::AutoFixUnsupported => {
                f.write_str("Multi-language structure detected; auto-fix not supported")
            }
        }
    }
}

/// Outcome of a check.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// File shape, `None` if the file is missing.
    pub layout: Option<Layout>,
    /// Problems, in discovery order.
    pub issues: Vec<Issue>,
    /// Keys removed, or that would be removed in a dry run.
    pub removed: Vec<String>,
    /// Hardcoded attributes found by auto-fix.
    pub hardcoded: Vec<HardcodedString>,
    /// Generated `(key, text)` pairs.
    pub added: Vec<(String, String)>,
    /// Templates rewritten by auto-fix.
    pub updated_files: Vec<PathBuf>,
}

impl CheckReport {
    /// True if no issue is an error.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.issues.iter().any(Issue::is_error)
    }
}

/// Check the translations file at `path`.
///
/// # Errors
///
/// Returns error if the file is unreadable, not a JSON object, a glob or key
/// pattern is invalid, or a fix cannot be written.
pub fn check_translations(path: &Path, options: &CheckOptions) -> Result<CheckReport, I18nError> {
    let mut report = CheckReport::default();

    if !path.exists() {
        tracing::warn!(path = %path.display(), "Translations file not found");
        report.issues.push(Issue::FileMissing(path.to_path_buf()));
        return Ok(report);
    }

    let content = std::fs::read_to_string(path).map_err(io_error(path))?;
    let data: Value = serde_json::from_str(&content).map_err(|source| I18nError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(mut data) = data else {
        return Err(I18nError::RootNotObject);
    };

    if data.values().next().is_some_and(Value::is_object) {
        if options.auto_fix {
            report.issues.push(Issue::AutoFixUnsupported);
        }
        check_languages(&data, &mut report)?;
        return Ok(report);
    }

    report.layout = Some(Layout::Flat { keys: data.len() });
    let Some(base) = options.base_path.as_deref() else {
        return Ok(report);
    };

    let scanner = KeyScanner::new(&options.html_glob, &options.js_glob, &options.key_pattern)?;
    let used = scanner.used_keys(base)?;
    let defined: BTreeSet<String> = data.keys().cloned().collect();

    let undefined: Vec<String> = used.difference(&defined).cloned().collect();
    if !undefined.is_empty() {
        report.issues.push(Issue::UndefinedKeys(undefined));
        return Ok(report);
    }

    let unused: Vec<String> = defined.difference(&used).cloned().collect();
    let mut changed = false;
    if !unused.is_empty() {
        report.issues.push(Issue::UnusedKeys(unused.clone()));
        if options.remove_unused {
            if !options.dry_run {
                for key in &unused {
                    data.shift_remove(key);
                }
                changed = true;
                tracing::info!(count = unused.len(), "Removed unused keys");
            }
            report.removed = unused;
        }
    }

    if options.auto_fix {
        report.hardcoded = find_hardcoded_strings(&scanner.html_files(base)?)?;
        if !report.hardcoded.is_empty() && !options.dry_run {
            let assigned = assign_keys(&report.hardcoded, &mut data, &options.key_prefix);
            report.updated_files = annotate_files(&assigned)?;
            report.added = assigned
                .into_iter()
                .map(|(finding, key)| (key, finding.text.clone()))
                .collect();
            changed = true;
        }
    }

    if changed {
        write_translations(path, data)?;
    }
    Ok(report)
}

fn check_languages(data: &Map<String, Value>, report: &mut CheckReport) -> Result<(), I18nError> {
    let mut per_language = Vec::with_capacity(data.len());
    for (lang, translations) in data {
        let Value::Object(translations) = translations else {
            return Err(I18nError::LanguageNotObject(lang.clone()));
        };
        let keys: BTreeSet<&str> = translations.keys().map(String::as_str).collect();
        per_language.push((lang.as_str(), keys));
    }

    report.layout = Some(Layout::MultiLanguage {
        languages: per_language.iter().map(|(lang, _)| (*lang).to_owned()).collect(),
    });

    let Some(((_, reference), others)) = per_language.split_first() else {
        return Ok(());
    };
    for (lang, keys) in others {
        let missing: Vec<String> = reference.difference(keys).map(|k| (*k).to_owned()).collect();
        let extra: Vec<String> = keys.difference(reference).map(|k| (*k).to_owned()).collect();
        if !missing.is_empty() {
            report.issues.push(Issue::MissingLanguageKeys {
                lang: (*lang).to_owned(),
                keys: missing,
            });
        }
        if !extra.is_empty() {
            report.issues.push(Issue::ExtraLanguageKeys {
                lang: (*lang).to_owned(),
                keys: extra,
            });
        }
    }
    Ok(())
}

/// Write `data` as 2-space indented JSON with a trailing newline.
fn write_translations(path: &Path, data: Map<String, Value>) -> Result<(), I18nError> {
    let mut text =
        serde_json::to_string_pretty(&Value::Object(data)).map_err(|source| {
            I18nError::InvalidJson {
                path: path.to_path_buf(),
                source,
            }
        })?;
    text.push('\n');
    std::fs::write(path, text).map_err(io_error(path))?;
    tracing::info!(path = %path.display(), "Updated translations");
    Ok(())
}
