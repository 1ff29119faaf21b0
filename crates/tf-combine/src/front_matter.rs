//! YAML front matter of a chapter.
//!
//! ```markdown
//! ---
//! title: Quotes
//! anchor: quotes
//! created: 2024-01-15
//! published: 2024-01-20
//! ---
//! ```

use chrono::NaiveDate;
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{CombineWarning, report};

/// Parsed front matter fields used by the combiner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// Chapter title, used when the navigation has no label.
    pub title: Option<String>,
    /// Explicit chapter anchor.
    pub anchor: Option<String>,
    /// Creation date.
    pub created: Option<NaiveDate>,
    /// Publication date.
    pub published: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct RawFrontMatter {
    title: Option<Value>,
    anchor: Option<Value>,
    created: Option<Value>,
    published: Option<Value>,
}

impl FrontMatter {
    /// Parse a front matter block, reporting recoverable problems.
    ///
    /// Malformed YAML yields an empty `FrontMatter` and a warning. A date
    /// that is not `YYYY-MM-DD` is dropped with a warning.
    pub(crate) fn parse(yaml: &str, path: &str, warnings: &mut Vec<CombineWarning>) -> Self {
        if yaml.trim().is_empty() {
            return Self::default();
        }

        let raw: RawFrontMatter = match serde_yaml::from_str(yaml) {
            Ok(raw) => raw,
            Err(e) => {
                report(
                    warnings,
                    CombineWarning::MalformedFrontMatter {
                        path: path.to_owned(),
                        message: e.to_string(),
                    },
                );
                return Self::default();
            }
        };

        Self {
            title: raw.title.as_ref().and_then(scalar_text),
            anchor: raw.anchor.as_ref().and_then(scalar_text),
            created: raw
                .created
                .as_ref()
                .and_then(|v| parse_date(v, path, "created", warnings)),
            published: raw
                .published
                .as_ref()
                .and_then(|v| parse_date(v, path, "published", warnings)),
        }
    }
}

/// Split a leading `---` front matter block from the body.
///
/// Returns the YAML text (without delimiters) and the remaining body. The
/// closing delimiter may be `---` or `...`.
pub(crate) fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, text)
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Tagged(tagged) => return scalar_text(&tagged.value),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_date(
    value: &Value,
    path: &str,
    field: &'static str,
    warnings: &mut Vec<CombineWarning>,
) -> Option<NaiveDate> {
    let raw = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_owned(),
        Value::Tagged(tagged) => return parse_date(&tagged.value, path, field, warnings),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_owned())
            .unwrap_or_default(),
    };

    // Timestamps keep only their date part.
    let date_part = match raw.get(10..11) {
        Some("T" | " ") => &raw[..10],
        _ => raw.as_str(),
    };
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            report(
                warnings,
                CombineWarning::MalformedFrontMatterDate {
                    path: path.to_owned(),
                    field,
                    value: raw,
                },
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_split_front_matter() {
        let (yaml, body) = split_front_matter("---\nanchor: quotes\n---\n# Title\n");
        assert_eq!(yaml, Some("anchor: quotes\n"));
        assert_eq!(body, "# Title\n");
    }

    #[test]
    fn test_split_front_matter_dots_terminator_and_crlf() {
        let (yaml, body) = split_front_matter("---\r\ntitle: A\r\n...\r\nText");
        assert_eq!(yaml, Some("title: A\r\n"));
        assert_eq!(body, "Text");
    }

    #[test]
    fn test_split_without_front_matter() {
        assert_eq!(split_front_matter("# Title"), (None, "# Title"));
    }

    #[test]
    fn test_split_unterminated_is_body() {
        let text = "---\ntitle: A\n# Title";
        assert_eq!(split_front_matter(text), (None, text));
    }

    #[test]
    fn test_split_thematic_break_later_is_not_front_matter() {
        let text = "Intro\n---\n";
        assert_eq!(split_front_matter(text), (None, text));
    }

    #[test]
    fn test_parse_all_fields() {
        let mut warnings = Vec::new();
        let fm = FrontMatter::parse(
            "title: Quotes\nanchor: quotes\ncreated: 2024-01-15\npublished: '2024-01-20'\n",
            "chapter2.md",
            &mut warnings,
        );

        assert_eq!(
            fm,
            FrontMatter {
                title: Some("Quotes".to_owned()),
                anchor: Some("quotes".to_owned()),
                created: date(2024, 1, 15),
                published: date(2024, 1, 20),
            }
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_timestamp_keeps_date() {
        let mut warnings = Vec::new();
        let fm = FrontMatter::parse("created: 2024-01-15 10:30:00\n", "a.md", &mut warnings);
        assert_eq!(fm.created, date(2024, 1, 15));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_malformed_date_warns_and_is_absent() {
        let mut warnings = Vec::new();
        let fm = FrontMatter::parse(
            "created: yesterday\npublished: 2024-02-30\n",
            "a.md",
            &mut warnings,
        );

        assert!(fm.created.is_none());
        assert!(fm.published.is_none());
        assert_eq!(
            warnings,
            vec![
                CombineWarning::MalformedFrontMatterDate {
                    path: "a.md".to_owned(),
                    field: "created",
                    value: "yesterday".to_owned(),
                },
                CombineWarning::MalformedFrontMatterDate {
                    path: "a.md".to_owned(),
                    field: "published",
                    value: "2024-02-30".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_numeric_date_is_malformed() {
        let mut warnings = Vec::new();
        let fm = FrontMatter::parse("created: 2024\n", "a.md", &mut warnings);
        assert!(fm.created.is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_invalid_yaml_warns() {
        let mut warnings = Vec::new();
        let fm = FrontMatter::parse("title: [unclosed\n", "a.md", &mut warnings);

        assert_eq!(fm, FrontMatter::default());
        assert!(matches!(
            warnings.as_slice(),
            [CombineWarning::MalformedFrontMatter { path, .. }] if path == "a.md"
        ));
    }

    #[test]
    fn test_non_mapping_yaml_warns() {
        let mut warnings = Vec::new();
        FrontMatter::parse("- a\n- b\n", "a.md", &mut warnings);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let mut warnings = Vec::new();
        let fm = FrontMatter::parse("tags: [a, b]\nanchor: x\n", "a.md", &mut warnings);
        assert_eq!(fm.anchor.as_deref(), Some("x"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_empty_block_is_default() {
        let mut warnings = Vec::new();
        assert_eq!(
            FrontMatter::parse("\n", "a.md", &mut warnings),
            FrontMatter::default()
        );
        assert!(warnings.is_empty());
    }
}
