//! Navigation tree and depth-first flattening.
//!
//! The `nav` section of `mkdocs.yml` is a list whose items take three shapes:
//!
//! ```yaml
//! nav:
//!   - index.md                  # page, label taken from the document
//!   - Chapter 1: chapter1.md    # titled page
//!   - Part Two:                 # section
//!       - part2/intro.md
//!   - Source: https://example.com/repo   # external link, not a chapter
//! ```

use serde_yaml::Value;

use crate::error::CombineError;
use crate::links::{is_external, normalize_path};

/// A node of the site navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEntry {
    /// Leaf referencing one markdown file.
    Page {
        /// Display label; `None` when inherited from the document.
        label: Option<String>,
        /// Docs-relative path.
        path: String,
    },
    /// Labelled group of further entries.
    Section {
        /// Display label.
        label: String,
        /// Child entries, in order.
        children: Vec<NavEntry>,
    },
    /// External link; never part of the combined document.
    Link {
        /// Display label.
        label: Option<String>,
        /// Target URL.
        url: String,
    },
}

impl NavEntry {
    /// Create a page entry.
    #[must_use]
    pub fn page(label: Option<&str>, path: &str) -> Self {
        Self::Page {
            label: label.map(str::to_owned),
            path: normalize_path(path),
        }
    }

    /// Create a section entry.
    #[must_use]
    pub fn section(label: &str, children: Vec<NavEntry>) -> Self {
        Self::Section {
            label: label.to_owned(),
            children,
        }
    }
}

/// A flattened navigation leaf in final document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLeaf {
    /// Display label from the navigation, if any.
    pub label: Option<String>,
    /// Docs-relative path.
    pub path: String,
}

/// Parse the `nav` value of a site configuration.
///
/// # Errors
///
/// Returns [`CombineError::MalformedNavigation`] if the value is not a list or
/// an item has an unsupported shape.
pub fn parse_nav(value: &Value) -> Result<Vec<NavEntry>, CombineError> {
    let Value::Sequence(items) = value else {
        return Err(CombineError::MalformedNavigation(format!(
            "expected a list, got {}",
            describe(value)
        )));
    };
    items.iter().map(parse_item).collect()
}

fn parse_item(item: &Value) -> Result<NavEntry, CombineError> {
    match item {
        Value::String(target) => Ok(leaf(None, target)),
        Value::Mapping(map) if map.len() == 1 => {
            let Some((key, value)) = map.iter().next() else {
                return Err(CombineError::MalformedNavigation("empty entry".to_owned()));
            };
            let label = match key {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(CombineError::MalformedNavigation(format!(
                        "entry label must be a string, got {}",
                        describe(other)
                    )));
                }
            };
            match value {
                Value::String(target) => Ok(leaf(Some(label), target)),
                Value::Sequence(children) => Ok(NavEntry::Section {
                    children: children
                        .iter()
                        .map(parse_item)
                        .collect::<Result<_, _>>()?,
                    label,
                }),
                other => Err(CombineError::MalformedNavigation(format!(
                    "entry {label:?} must map to a path or a list, got {}",
                    describe(other)
                ))),
            }
        }
        Value::Tagged(tagged) => parse_item(&tagged.value),
        other => Err(CombineError::MalformedNavigation(format!(
            "unsupported entry {}",
            describe(other)
        ))),
    }
}

fn leaf(label: Option<String>, target: &str) -> NavEntry {
    let target = target.trim();
    if is_external(target) {
        NavEntry::Link {
            label,
            url: target.to_owned(),
        }
    } else {
        NavEntry::Page {
            label,
            path: normalize_path(target),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Flatten navigation into leaves, depth-first and order-preserving.
///
/// Sections contribute their children in place; external links are dropped.
#[must_use]
pub fn flatten(entries: &[NavEntry]) -> Vec<NavLeaf> {
    let mut leaves = Vec::new();
    let mut stack = vec![entries.iter()];

    while let Some(level) = stack.last_mut() {
        let Some(entry) = level.next() else {
            stack.pop();
            continue;
        };
        match entry {
            NavEntry::Page { label, path } => leaves.push(NavLeaf {
                label: label.clone(),
                path: path.clone(),
            }),
            NavEntry::Section { children, .. } => stack.push(children.iter()),
            NavEntry::Link { .. } => {}
        }
    }

    leaves
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn nav(yaml: &str) -> Result<Vec<NavEntry>, CombineError> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        parse_nav(&value)
    }

    fn paths(leaves: &[NavLeaf]) -> Vec<&str> {
        leaves.iter().map(|l| l.path.as_str()).collect()
    }

    #[test]
    fn test_parse_all_item_shapes() {
        let entries = nav(r"
- index.md
- Chapter 1: chapter1.md
- Part Two:
    - part2/intro.md
    - Deep: part2/deep.md
- Source: https://example.com/repo
")
        .unwrap();

        assert_eq!(
            entries,
            vec![
                NavEntry::page(None, "index.md"),
                NavEntry::page(Some("Chapter 1"), "chapter1.md"),
                NavEntry::section(
                    "Part Two",
                    vec![
                        NavEntry::page(None, "part2/intro.md"),
                        NavEntry::page(Some("Deep"), "part2/deep.md"),
                    ]
                ),
                NavEntry::Link {
                    label: Some("Source".to_owned()),
                    url: "https://example.com/repo".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_normalizes_paths() {
        let entries = nav("- ./part1/../chapter1.md").unwrap();
        assert_eq!(entries, vec![NavEntry::page(None, "chapter1.md")]);
    }

    #[test]
    fn test_parse_rejects_non_list() {
        let err = nav("index.md").unwrap_err();
        assert!(matches!(err, CombineError::MalformedNavigation(_)));
        assert!(err.to_string().contains("expected a list"));
    }

    #[test]
    fn test_parse_rejects_multi_key_mapping() {
        let err = nav("- {A: a.md, B: b.md}").unwrap_err();
        assert!(matches!(err, CombineError::MalformedNavigation(_)));
    }

    #[test]
    fn test_parse_rejects_null_target() {
        let err = nav("- Empty:").unwrap_err();
        assert!(err.to_string().contains("Empty"));
    }

    #[test]
    fn test_flatten_depth_first_order() {
        let entries = vec![
            NavEntry::page(Some("Home"), "index.md"),
            NavEntry::section(
                "Part 1",
                vec![
                    NavEntry::page(None, "p1/a.md"),
                    NavEntry::section("Nested", vec![NavEntry::page(None, "p1/n/b.md")]),
                    NavEntry::page(None, "p1/c.md"),
                ],
            ),
            NavEntry::Link {
                label: None,
                url: "https://example.com".to_owned(),
            },
            NavEntry::page(None, "last.md"),
        ];

        let leaves = flatten(&entries);

        assert_eq!(
            paths(&leaves),
            vec!["index.md", "p1/a.md", "p1/n/b.md", "p1/c.md", "last.md"]
        );
        assert_eq!(leaves[0].label.as_deref(), Some("Home"));
        assert!(leaves[1].label.is_none());
    }

    #[test]
    fn test_flatten_empty_sections() {
        let entries = vec![NavEntry::section("Empty", Vec::new())];
        assert!(flatten(&entries).is_empty());
    }
}
