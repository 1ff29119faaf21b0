//! Translation keys referenced by theme templates and scripts.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use glob::Pattern;
use regex::Regex;

use crate::error::{I18nError, io_error};

/// `data-i18n="key"`, `data-i18n-title="key"`, ...
static I18N_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-i18n(?:-\w+)?="([^"]+)""#).expect("valid data-i18n regex")
});

/// Finds theme files and the keys they use.
#[derive(Debug)]
pub struct KeyScanner {
    html: Pattern,
    js: Pattern,
    js_call: Regex,
}

impl KeyScanner {
    /// Create a scanner.
    ///
    /// `key_pattern` restricts which `t('...')` arguments count as keys.
    ///
    /// # Errors
    ///
    /// Returns error if a glob or the key pattern is invalid.
    pub fn new(html_glob: &str, js_glob: &str, key_pattern: &str) -> Result<Self, I18nError> {
        let js_call = Regex::new(&format!(r#"t\(['"]({key_pattern})['"]\)"#))?;
        Ok(Self {
            html: compile_glob(html_glob)?,
            js: compile_glob(js_glob)?,
            js_call,
        })
    }

    /// HTML files under `base`, sorted.
    ///
    /// # Errors
    ///
    /// Returns error if the directory walk fails.
    pub fn html_files(&self, base: &Path) -> Result<Vec<PathBuf>, I18nError> {
        matching_files(base, &self.html)
    }

    /// Keys used in HTML attributes and JS `t()` calls under `base`.
    ///
    /// # Errors
    ///
    /// Returns error if the walk fails or a file cannot be read.
    pub fn used_keys(&self, base: &Path) -> Result<BTreeSet<String>, I18nError> {
        let mut keys = BTreeSet::new();

        for path in self.html_files(base)? {
            let content = std::fs::read_to_string(&path).map_err(io_error(&path))?;
            keys.extend(
                I18N_ATTRIBUTE
                    .captures_iter(&content)
                    .map(|caps| caps[1].to_owned()),
            );
        }

        for path in matching_files(base, &self.js)? {
            let content = std::fs::read_to_string(&path).map_err(io_error(&path))?;
            keys.extend(
                self.js_call
                    .captures_iter(&content)
                    .map(|caps| caps[1].to_owned()),
            );
        }

        tracing::debug!(count = keys.len(), base = %base.display(), "Collected used keys");
        Ok(keys)
    }
}

fn compile_glob(pattern: &str) -> Result<Pattern, I18nError> {
    Pattern::new(pattern).map_err(|source| I18nError::Glob {
        pattern: pattern.to_owned(),
        source,
    })
}

/// Files under `base` whose relative path matches `pattern`.
fn matching_files(base: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, I18nError> {
    let mut files = Vec::new();
    if !base.is_dir() {
        return Ok(files);
    }

    for entry in ignore::WalkBuilder::new(base).hidden(true).build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(base) else {
            continue;
        };
        if pattern.matches_path(rel) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
