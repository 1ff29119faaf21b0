//! Combining chapters into one manuscript.
//!
//! A run goes through fixed phases, each finished for every chapter before
//! the next starts:
//!
//! 1. resolve the navigation into leaves (or list the source)
//! 2. check that every chapter file exists
//! 3. read chapters and their front matter
//! 4. assign anchors
//! 5. per chapter: rewrite links, place the anchor, inject dates
//!
//! Nothing is written until the whole document has been built.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::anchor::{AnchorTable, AnchorTableBuilder, is_valid_anchor, slugify};
use crate::chapter::{Outline, outline};
use crate::dates::DateLabels;
use crate::error::{CombineError, CombineWarning, report};
use crate::front_matter::{FrontMatter, split_front_matter};
use crate::links::rewrite_links;
use crate::nav::{NavEntry, NavLeaf, flatten};
use crate::source::ChapterSource;

/// Options for a combine run.
#[derive(Clone, Debug, Default)]
pub struct CombineOptions {
    /// Labels and date format of the chapter dates block.
    pub labels: DateLabels,
}

/// One chapter as placed in the combined document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterSummary {
    /// Docs-relative source path.
    pub path: String,
    /// Label from the navigation or the front matter title.
    pub label: Option<String>,
    /// Anchor of the chapter in the combined document.
    pub anchor: String,
}

/// Result of a combine run.
#[derive(Clone, Debug)]
pub struct CombinedDocument {
    /// Combined markdown, ending with exactly one newline.
    pub text: String,
    /// Chapters in document order.
    pub chapters: Vec<ChapterSummary>,
    /// Recoverable anomalies found along the way.
    pub warnings: Vec<CombineWarning>,
}

impl CombinedDocument {
    /// Write the combined text to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::Write`] on I/O failure.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), CombineError> {
        let path = path.as_ref();
        let write_error = |source: std::io::Error| CombineError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, &self.text).map_err(write_error)?;
        tracing::info!(path = %path.display(), chapters = self.chapters.len(), "Wrote combined document");
        Ok(())
    }
}

/// A chapter read from the source, before rendering.
struct LoadedChapter {
    leaf: NavLeaf,
    front: FrontMatter,
    body: String,
}

impl LoadedChapter {
    fn label(&self) -> Option<&str> {
        self.leaf
            .label
            .as_deref()
            .or(self.front.title.as_deref())
    }
}

/// Combines chapters from a [`ChapterSource`].
pub struct Combiner<'a> {
    source: &'a dyn ChapterSource,
    options: CombineOptions,
}

impl<'a> Combiner<'a> {
    /// Create a combiner over `source`.
    #[must_use]
    pub fn new(source: &'a dyn ChapterSource, options: CombineOptions) -> Self {
        Self { source, options }
    }

    /// Combine the chapters referenced by `nav`.
    ///
    /// Without navigation, every markdown file of the source is combined in
    /// listing order.
    ///
    /// # Errors
    ///
    /// - [`CombineError::MissingChapterFile`] if a navigation path does not exist
    /// - [`CombineError::NoChapters`] if there is nothing to combine
    /// - [`CombineError::Read`] if a chapter cannot be read
    pub fn combine(&self, nav: Option<&[NavEntry]>) -> Result<CombinedDocument, CombineError> {
        let mut warnings = Vec::new();

        let leaves = self.resolve_leaves(nav, &mut warnings)?;
        if leaves.is_empty() {
            return Err(CombineError::NoChapters);
        }
        if let Some(missing) = leaves.iter().find(|leaf| !self.source.exists(&leaf.path)) {
            return Err(CombineError::MissingChapterFile {
                path: missing.path.clone(),
            });
        }

        let chapters = leaves
            .into_iter()
            .map(|leaf| self.load(leaf, &mut warnings))
            .collect::<Result<Vec<_>, _>>()?;

        let table = assign_anchors(&chapters, &mut warnings);

        let mut parts = Vec::with_capacity(chapters.len());
        let mut summaries = Vec::with_capacity(chapters.len());
        for chapter in &chapters {
            let anchor = table.anchor(&chapter.leaf.path).unwrap_or_default().to_owned();
            tracing::debug!(path = %chapter.leaf.path, anchor = %anchor, "Rendering chapter");
            parts.push(self.render(chapter, &anchor, &table, &mut warnings));
            summaries.push(ChapterSummary {
                path: chapter.leaf.path.clone(),
                label: chapter.label().map(str::to_owned),
                anchor,
            });
        }

        let mut text = parts.join("\n\n");
        text.push('\n');

        tracing::info!(
            chapters = summaries.len(),
            warnings = warnings.len(),
            "Combined chapters"
        );

        Ok(CombinedDocument {
            text,
            chapters: summaries,
            warnings,
        })
    }

    fn resolve_leaves(
        &self,
        nav: Option<&[NavEntry]>,
        warnings: &mut Vec<CombineWarning>,
    ) -> Result<Vec<NavLeaf>, CombineError> {
        let leaves = match nav {
            Some(entries) => flatten(entries),
            None => self
                .source
                .list()
                .map_err(|source| CombineError::Read {
                    path: ".".to_owned(),
                    source,
                })?
                .into_iter()
                .map(|path| NavLeaf { label: None, path })
                .collect(),
        };

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            if seen.insert(leaf.path.clone()) {
                unique.push(leaf);
            } else {
                report(
                    warnings,
                    CombineWarning::DuplicateNavEntry { path: leaf.path },
                );
            }
        }
        Ok(unique)
    }

    fn load(
        &self,
        leaf: NavLeaf,
        warnings: &mut Vec<CombineWarning>,
    ) -> Result<LoadedChapter, CombineError> {
        let raw = self
            .source
            .read(&leaf.path)
            .map_err(|source| CombineError::Read {
                path: leaf.path.clone(),
                source,
            })?;

        let (yaml, body) = split_front_matter(&raw);
        let front = yaml.map_or_else(FrontMatter::default, |yaml| {
            FrontMatter::parse(yaml, &leaf.path, warnings)
        });
        let body = body.trim_start_matches(['\r', '\n']).trim_end().to_owned();

        Ok(LoadedChapter { leaf, front, body })
    }

    fn render(
        &self,
        chapter: &LoadedChapter,
        anchor: &str,
        table: &AnchorTable,
        warnings: &mut Vec<CombineWarning>,
    ) -> String {
        let body = rewrite_links(&chapter.body, &chapter.leaf.path, table, warnings);
        let dates = self
            .options
            .labels
            .render(chapter.front.created, chapter.front.published);

        let (head, rest) = match outline(&body).leading {
            Some(heading) => {
                let mut head = String::new();
                match heading.id.as_deref() {
                    Some(id) if id == anchor => head.push_str(&body[..heading.end]),
                    Some(_) => {
                        head.push_str(&format!("[]{{#{anchor}}}\n\n"));
                        head.push_str(&body[..heading.end]);
                    }
                    None if heading.has_attributes => {
                        // `{.class}` → `{.class #anchor}`
                        let close = body[..heading.attribute_offset]
                            .rfind('}')
                            .unwrap_or(heading.attribute_offset);
                        head.push_str(&body[..close]);
                        head.push_str(&format!(" #{anchor}"));
                        head.push_str(&body[close..heading.end]);
                    }
                    None => {
                        head.push_str(&body[..heading.attribute_offset]);
                        head.push_str(&format!(" {{#{anchor}}}"));
                        head.push_str(&body[heading.attribute_offset..heading.end]);
                    }
                }
                (head, &body[heading.end..])
            }
            None => {
                let head = match chapter.label() {
                    Some(label) => format!("# {label} {{#{anchor}}}"),
                    None => format!("[]{{#{anchor}}}"),
                };
                (head, body.as_str())
            }
        };

        let mut out = head.trim_end().to_owned();
        if let Some(dates) = dates {
            out.push_str("\n\n");
            out.push_str(&dates);
        }
        let rest = rest.trim_start_matches(['\r', '\n']);
        if !rest.is_empty() {
            out.push_str("\n\n");
            out.push_str(rest);
        }
        out
    }
}

/// Assign anchors to every chapter, in navigation order.
///
/// Explicit heading ids of all chapters are reserved first. A chapter may
/// only take an id that is its own leading heading's.
fn assign_anchors(chapters: &[LoadedChapter], warnings: &mut Vec<CombineWarning>) -> AnchorTable {
    let outlines: Vec<Outline> = chapters.iter().map(|c| outline(&c.body)).collect();

    let mut builder = AnchorTableBuilder::new();
    for (chapter, outline) in chapters.iter().zip(&outlines) {
        let leading_id = outline.leading.as_ref().and_then(|h| h.id.as_deref());
        for id in &outline.ids {
            let owner = (leading_id == Some(id.as_str())).then_some(chapter.leaf.path.as_str());
            builder.reserve(id, owner);
        }
    }

    for (chapter, outline) in chapters.iter().zip(outlines) {
        let anchor = anchor_override(chapter, warnings);
        builder.push(&chapter.leaf.path, anchor.as_deref(), outline.ids);
    }
    builder.build()
}

/// Front matter anchor, slugified with a warning when it is not a valid id.
fn anchor_override(chapter: &LoadedChapter, warnings: &mut Vec<CombineWarning>) -> Option<String> {
    let anchor = chapter.front.anchor.as_deref()?.trim();
    if anchor.is_empty() || is_valid_anchor(anchor) {
        return Some(anchor.to_owned());
    }
    let replacement = slugify(anchor);
    report(
        warnings,
        CombineWarning::InvalidAnchor {
            path: chapter.leaf.path.clone(),
            anchor: anchor.to_owned(),
            replacement: replacement.clone(),
        },
    );
    Some(replacement)
}

/// Default output location of the combined document inside a build directory.
#[must_use]
pub fn default_output(build_dir: &Path) -> PathBuf {
    build_dir.join("text_combined.txt")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::MockSource;

    fn combine(source: &MockSource, nav: &[NavEntry]) -> CombinedDocument {
        Combiner::new(source, CombineOptions::default())
            .combine(Some(nav))
            .unwrap()
    }

    #[test]
    fn test_appends_anchor_to_leading_heading() {
        let source = MockSource::new()
            .with_chapter("index.md", "# Home\n\nSee [one](chapter1.md).\n")
            .with_chapter("chapter1.md", "# One\n\nBody.\n");
        let nav = [
            NavEntry::page(None, "index.md"),
            NavEntry::page(None, "chapter1.md"),
        ];

        let doc = combine(&source, &nav);

        assert_eq!(
            doc.text,
            "# Home {#index-md}\n\nSee [one](#chapter1-md).\n\n# One {#chapter1-md}\n\nBody.\n"
        );
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_inserts_heading_from_nav_label() {
        let source = MockSource::new().with_chapter("a.md", "Plain text.");
        let nav = [NavEntry::page(Some("Alpha"), "a.md")];

        assert_eq!(combine(&source, &nav).text, "# Alpha {#a-md}\n\nPlain text.\n");
    }

    #[test]
    fn test_uses_front_matter_title_without_nav_label() {
        let source = MockSource::new().with_chapter("a.md", "---\ntitle: Alpha\n---\nText.");
        let nav = [NavEntry::page(None, "a.md")];

        assert_eq!(combine(&source, &nav).text, "# Alpha {#a-md}\n\nText.\n");
    }

    #[test]
    fn test_span_anchor_without_heading_or_label() {
        let source = MockSource::new().with_chapter("a.md", "Text.");
        let nav = [NavEntry::page(None, "a.md")];

        assert_eq!(combine(&source, &nav).text, "[]{#a-md}\n\nText.\n");
    }

    #[test]
    fn test_existing_heading_id_kept() {
        let source = MockSource::new()
            .with_chapter("a.md", "# A {#intro}\n\nText.")
            .with_chapter("b.md", "---\nanchor: b-anchor\n---\n# B {#b-anchor}\n");
        let nav = [NavEntry::page(None, "a.md"), NavEntry::page(None, "b.md")];

        assert_eq!(
            combine(&source, &nav).text,
            "[]{#a-md}\n\n# A {#intro}\n\nText.\n\n# B {#b-anchor}\n"
        );
    }

    #[test]
    fn test_heading_class_block_extended() {
        let source = MockSource::new().with_chapter("a.md", "# A {.wide}\n");
        let nav = [NavEntry::page(None, "a.md")];

        assert_eq!(combine(&source, &nav).text, "# A {.wide #a-md}\n");
    }

    #[test]
    fn test_dates_block_after_heading() {
        let source = MockSource::new().with_chapter(
            "a.md",
            "---\ncreated: 2024-01-15\n---\n# A\n\nText.",
        );
        let nav = [NavEntry::page(None, "a.md")];

        assert_eq!(
            combine(&source, &nav).text,
            "# A {#a-md}\n\n/// chapter-dates\nCreated: 2024-01-15\n///\n\nText.\n"
        );
    }

    #[test]
    fn test_missing_chapter_fails_before_reading() {
        let source = MockSource::new().with_chapter("a.md", "A");
        let nav = [NavEntry::page(None, "a.md"), NavEntry::page(None, "gone.md")];

        let err = Combiner::new(&source, CombineOptions::default())
            .combine(Some(nav.as_slice()))
            .unwrap_err();
        assert!(matches!(err, CombineError::MissingChapterFile { path } if path == "gone.md"));
    }

    #[test]
    fn test_empty_nav_is_error() {
        let source = MockSource::new();
        let err = Combiner::new(&source, CombineOptions::default())
            .combine(Some(&[] as &[NavEntry]))
            .unwrap_err();
        assert!(matches!(err, CombineError::NoChapters));
    }

    #[test]
    fn test_without_nav_uses_source_listing() {
        let source = MockSource::new()
            .with_chapter("b.md", "# B")
            .with_chapter("index.md", "# Home");

        let doc = Combiner::new(&source, CombineOptions::default())
            .combine(None)
            .unwrap();

        let paths: Vec<_> = doc.chapters.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["index.md", "b.md"]);
    }

    #[test]
    fn test_duplicate_nav_entry_combined_once() {
        let source = MockSource::new().with_chapter("a.md", "# A");
        let nav = [NavEntry::page(None, "a.md"), NavEntry::page(Some("Again"), "a.md")];

        let doc = combine(&source, &nav);

        assert_eq!(doc.text, "# A {#a-md}\n");
        assert_eq!(
            doc.warnings,
            vec![CombineWarning::DuplicateNavEntry {
                path: "a.md".to_owned()
            }]
        );
    }

    #[test]
    fn test_same_base_names_get_suffixed_anchors() {
        let source = MockSource::new()
            .with_chapter("p1/index.md", "# Part 1\n\n[next](../p2/index.md)")
            .with_chapter("p2/index.md", "# Part 2");
        let nav = [
            NavEntry::page(None, "p1/index.md"),
            NavEntry::page(None, "p2/index.md"),
        ];

        let doc = combine(&source, &nav);

        assert_eq!(
            doc.text,
            "# Part 1 {#index-md}\n\n[next](#index-md-2)\n\n# Part 2 {#index-md-2}\n"
        );
    }

    #[test]
    fn test_summaries_report_labels_and_anchors() {
        let source = MockSource::new()
            .with_chapter("a.md", "---\nanchor: alpha\n---\nText")
            .with_chapter("b.md", "Text");
        let nav = [
            NavEntry::page(Some("A"), "a.md"),
            NavEntry::page(None, "b.md"),
        ];

        assert_eq!(
            combine(&source, &nav).chapters,
            vec![
                ChapterSummary {
                    path: "a.md".to_owned(),
                    label: Some("A".to_owned()),
                    anchor: "alpha".to_owned(),
                },
                ChapterSummary {
                    path: "b.md".to_owned(),
                    label: None,
                    anchor: "b-md".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_write_to_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockSource::new().with_chapter("a.md", "# A");
        let doc = combine(&source, &[NavEntry::page(None, "a.md")]);

        let out = default_output(&dir.path().join("build"));
        doc.write_to(&out).unwrap();

        assert_eq!(std::fs::read_to_string(out).unwrap(), "# A {#a-md}\n");
    }

    #[test]
    fn test_chapter_anchor_avoids_heading_id_of_other_chapter() {
        let source = MockSource::new()
            .with_chapter("a.md", "# A\n\n## Quotes {#quotes}\n\nGo to [b](b.md).")
            .with_chapter("b.md", "---\nanchor: quotes\n---\n# B\n\nBack to [quotes](a.md#quotes).");
        let nav = [NavEntry::page(None, "a.md"), NavEntry::page(None, "b.md")];

        let doc = combine(&source, &nav);

        assert_eq!(
            doc.text,
            "# A {#a-md}\n\n## Quotes {#quotes}\n\nGo to [b](#quotes-2).\n\n\
             # B {#quotes-2}\n\nBack to [quotes](#quotes).\n"
        );
        assert_eq!(doc.text.matches("{#quotes}").count(), 1);
    }

    #[test]
    fn test_heading_after_leading_comment() {
        let source = MockSource::new().with_chapter("a.md", "<!-- note -->\n# A\n\nText.");
        let nav = [NavEntry::page(Some("Alpha"), "a.md")];

        assert_eq!(
            combine(&source, &nav).text,
            "<!-- note -->\n# A {#a-md}\n\nText.\n"
        );
    }

    #[test]
    fn test_invalid_anchor_override_slugified() {
        let source = MockSource::new().with_chapter("a.md", "---\nanchor: My Quotes\n---\n# A");
        let nav = [NavEntry::page(None, "a.md")];

        let doc = combine(&source, &nav);

        assert_eq!(doc.text, "# A {#my-quotes}\n");
        assert_eq!(
            doc.warnings,
            vec![CombineWarning::InvalidAnchor {
                path: "a.md".to_owned(),
                anchor: "My Quotes".to_owned(),
                replacement: "my-quotes".to_owned(),
            }]
        );
    }
}
