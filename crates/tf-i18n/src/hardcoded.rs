//! Hardcoded `title`/`placeholder` attributes and their automatic fix.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::error::{I18nError, io_error};

/// Longest generated key, in characters.
const MAX_KEY_LEN: usize = 64;

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\btitle="([^"]+)""#).expect("valid title regex"));
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bplaceholder="([^"]+)""#).expect("valid placeholder regex")
});
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid underscore regex"));

/// Translatable HTML attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Attribute {
    /// `title="..."`
    Title,
    /// `placeholder="..."`
    Placeholder,
}

impl Attribute {
    /// Attribute name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Placeholder => "placeholder",
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::Title => &TITLE,
            Self::Placeholder => &PLACEHOLDER,
        }
    }
}

/// Attribute text without a `data-i18n-*` twin on the same line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HardcodedString {
    /// File containing the attribute.
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// Attribute kind.
    pub attribute: Attribute,
    /// Hardcoded text.
    pub text: String,
}

impl fmt::Display for HardcodedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}=\"{}\"",
            self.path.display(),
            self.line,
            self.attribute.name(),
            self.text
        )
    }
}

/// Find hardcoded attributes in `files`, first match per attribute and line.
///
/// # Errors
///
/// Returns error if a file cannot be read.
pub fn find_hardcoded_strings(files: &[PathBuf]) -> Result<Vec<HardcodedString>, I18nError> {
    let mut findings = Vec::new();
    for path in files {
        let content = std::fs::read_to_string(path).map_err(io_error(path))?;
        for (index, line) in content.lines().enumerate() {
            for attribute in [Attribute::Title, Attribute::Placeholder] {
                if line.contains(&format!("data-i18n-{}", attribute.name())) {
                    continue;
                }
                if let Some(caps) = attribute.regex().captures(line) {
                    findings.push(HardcodedString {
                        path: path.clone(),
                        line: index + 1,
                        attribute,
                        text: caps[1].to_owned(),
                    });
                }
            }
        }
    }
    Ok(findings)
}

/// Derive a translation key from display text.
///
/// Lowercases, drops punctuation, joins words with `_`, prepends `prefix`
/// and truncates to 64 characters.
#[must_use]
pub fn generate_translation_key(text: &str, prefix: &str) -> String {
    let lower = text.to_lowercase();
    let words = NON_WORD.replace_all(&lower, "");
    let joined = WHITESPACE.replace_all(words.trim(), "_");
    let mut key = UNDERSCORES.replace_all(&joined, "_").into_owned();
    if !prefix.is_empty() {
        key = format!("{prefix}_{key}");
    }
    key.chars().take(MAX_KEY_LEN).collect()
}

/// `key`, or `key_1`, `key_2`, ... if taken.
fn unique_key(key: String, translations: &Map<String, Value>) -> String {
    if !translations.contains_key(&key) {
        return key;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{key}_{n}");
        if !translations.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Add a generated key per finding to `translations`.
///
/// Returns `(finding, key)` pairs in finding order.
pub(crate) fn assign_keys<'a>(
    findings: &'a [HardcodedString],
    translations: &mut Map<String, Value>,
    prefix: &str,
) -> Vec<(&'a HardcodedString, String)> {
    let mut assigned = Vec::with_capacity(findings.len());
    for finding in findings {
        let key = unique_key(generate_translation_key(&finding.text, prefix), translations);
        translations.insert(key.clone(), Value::String(finding.text.clone()));
        tracing::info!(key = %key, text = %finding.text, "Added translation key");
        assigned.push((finding, key));
    }
    assigned
}

/// Add `data-i18n-<attr>="key"` after each fixed attribute.
///
/// Returns the rewritten files.
///
/// # Errors
///
/// Returns error if a file cannot be read or written.
pub(crate) fn annotate_files(
    assigned: &[(&HardcodedString, String)],
) -> Result<Vec<PathBuf>, I18nError> {
    let mut per_file: BTreeMap<&Path, Vec<(usize, Attribute, &str)>> = BTreeMap::new();
    for (finding, key) in assigned {
        per_file.entry(finding.path.as_path()).or_default().push((
            finding.line,
            finding.attribute,
            key.as_str(),
        ));
    }

    let mut updated = Vec::with_capacity(per_file.len());
    for (path, edits) in per_file {
        let content = std::fs::read_to_string(path).map_err(io_error(path))?;
        let mut lines: Vec<String> = content.lines().map(str::to_owned).collect();

        for (line_number, attribute, key) in edits {
            let Some(line) = lines.get_mut(line_number - 1) else {
                continue;
            };
            let annotated = attribute
                .regex()
                .replacen(line.as_str(), 1, |caps: &Captures| {
                    format!(r#"{} data-i18n-{}="{key}""#, &caps[0], attribute.name())
                })
                .into_owned();
            *line = annotated;
        }

        let mut text = lines.join("\n");
        text.push('\n');
        std::fs::write(path, text).map_err(io_error(path))?;
        tracing::info!(path = %path.display(), "Updated template");
        updated.push(path.to_path_buf());
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_generate_translation_key() {
        assert_eq!(generate_translation_key("Save changes!", "auto"), "auto_save_changes");
        assert_eq!(generate_translation_key("  Hello,   World  ", ""), "hello_world");
        assert_eq!(generate_translation_key("a -- b", ""), "a_b");
        assert_eq!(generate_translation_key("Сохранить файл", "ui"), "ui_сохранить_файл");
    }

    #[test]
    fn test_generate_translation_key_truncates() {
        let key = generate_translation_key(&"word ".repeat(30), "auto");
        assert_eq!(key.chars().count(), 64);
        assert!(key.starts_with("auto_word_word"));
    }

    #[test]
    fn test_unique_key_suffixes() {
        let mut map = Map::new();
        map.insert("auto_save".to_owned(), Value::from("Save"));
        map.insert("auto_save_1".to_owned(), Value::from("Save"));

        assert_eq!(unique_key("auto_save".to_owned(), &map), "auto_save_2");
        assert_eq!(unique_key("auto_open".to_owned(), &map), "auto_open");
    }

    #[test]
    fn test_find_hardcoded_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.html");
        fs::write(
            &path,
            concat!(
                "<button title=\"Save\">\n",
                "<input placeholder=\"Search\" data-i18n-placeholder=\"search\">\n",
                "<div subtitle=\"x\" title=\"Close\" placeholder=\"Type here\">\n",
            ),
        )
        .unwrap();

        let findings = find_hardcoded_strings(&[path.clone()]).unwrap();

        let summary: Vec<_> = findings
            .iter()
            .map(|f| (f.line, f.attribute, f.text.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, Attribute::Title, "Save"),
                (3, Attribute::Title, "Close"),
                (3, Attribute::Placeholder, "Type here"),
            ]
        );
        assert_eq!(
            findings[0].to_string(),
            format!("{}:1 title=\"Save\"", path.display())
        );
    }

    #[test]
    fn test_assign_and_annotate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.html");
        fs::write(
            &path,
            "<button title=\"Save\">\r\n<input title=\"Save\" placeholder=\"Find\">\n",
        )
        .unwrap();
        let findings = find_hardcoded_strings(&[path.clone()]).unwrap();
        let mut translations = Map::new();

        let assigned = assign_keys(&findings, &mut translations, "auto");
        let updated = annotate_files(&assigned).unwrap();

        assert_eq!(updated, vec![path.clone()]);
        assert_eq!(
            translations.keys().collect::<Vec<_>>(),
            vec!["auto_save", "auto_save_1", "auto_find"]
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            concat!(
                "<button title=\"Save\" data-i18n-title=\"auto_save\">\n",
                "<input title=\"Save\" data-i18n-title=\"auto_save_1\" ",
                "placeholder=\"Find\" data-i18n-placeholder=\"auto_find\">\n",
            )
        );
    }
}
