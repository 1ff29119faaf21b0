//! Rewriting chapter-to-chapter links into in-document anchors.
//!
//! Links are located with `pulldown-cmark` source offsets, so code spans,
//! fenced code and images are never touched. Only the destination part of an
//! inline link is replaced:
//!
//! - `[Chapter 1](chapter1.md)` → `[Chapter 1](#chapter1-md)`
//! - `[Quotes](../chapter2.md#quotes "Title")` → `[Quotes](#quotes "Title")`
//!
//! External URLs, fragment-only links and unknown paths stay byte-identical.

use std::borrow::Cow;
use std::ops::Range;

use percent_encoding::percent_decode_str;
use pulldown_cmark::{Event, LinkType, Parser, Tag};

use crate::anchor::AnchorTable;
use crate::chapter::markdown_options;
use crate::error::{CombineWarning, report};

/// A link destination resolved against the docs root.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LinkTarget {
    /// Normalized docs-relative path.
    pub path: String,
    /// Fragment without the leading `#`.
    pub fragment: Option<String>,
}

/// Check whether a URL points outside the project.
pub(crate) fn is_external(url: &str) -> bool {
    url.starts_with("//")
        || url.contains("://")
        || ["mailto:", "tel:", "data:", "javascript:"]
            .iter()
            .any(|scheme| url.starts_with(scheme))
}

/// Normalize a docs-relative path.
///
/// Resolves `.` and `..` segments, drops empty segments and converts
/// backslashes. `..` above the root is clamped.
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }
    segments.join("/")
}

/// Resolve a link URL found in `chapter_path` to a docs-relative target.
///
/// Returns `None` for external URLs, fragment-only links and empty paths.
pub(crate) fn resolve_target(url: &str, chapter_path: &str) -> Option<LinkTarget> {
    let url = url.trim();
    if url.is_empty() || url.starts_with('#') || is_external(url) {
        return None;
    }

    let (path_part, fragment) = match url.split_once('#') {
        Some((path, frag)) => (path, Some(frag)),
        None => (url, None),
    };
    let path_part = path_part.split_once('?').map_or(path_part, |(p, _)| p);
    if path_part.is_empty() {
        return None;
    }

    let decoded: Cow<'_, str> = percent_decode_str(path_part).decode_utf8_lossy();
    let joined = match (decoded.strip_prefix('/'), chapter_path.rsplit_once('/')) {
        (Some(absolute), _) => absolute.to_owned(),
        (None, Some((dir, _))) => format!("{dir}/{decoded}"),
        (None, None) => decoded.to_string(),
    };

    Some(LinkTarget {
        path: normalize_path(&joined),
        fragment: fragment.filter(|f| !f.is_empty()).map(str::to_owned),
    })
}

/// Rewrite links in a chapter body whose targets are known chapters.
///
/// Links to `.md` files that are not in the table are reported as
/// [`CombineWarning::UnresolvedLink`] and left unchanged.
pub(crate) fn rewrite_links(
    body: &str,
    chapter_path: &str,
    table: &AnchorTable,
    warnings: &mut Vec<CombineWarning>,
) -> String {
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();

    for (event, range) in Parser::new_ext(body, markdown_options()).into_offset_iter() {
        let Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url,
            ..
        }) = event
        else {
            continue;
        };

        let Some(target) = resolve_target(&dest_url, chapter_path) else {
            continue;
        };

        let Some(anchor) = table.resolve(&target.path, target.fragment.as_deref()) else {
            if target.path.ends_with(".md") {
                report(
                    warnings,
                    CombineWarning::UnresolvedLink {
                        chapter: chapter_path.to_owned(),
                        target: (*dest_url).to_owned(),
                    },
                );
            }
            continue;
        };

        let Some(dest) = locate_destination(&body[range.clone()]) else {
            report(
                warnings,
                CombineWarning::LinkNotRewritten {
                    chapter: chapter_path.to_owned(),
                    target: (*dest_url).to_owned(),
                },
            );
            continue;
        };

        edits.push((
            range.start + dest.start..range.start + dest.end,
            format!("#{anchor}"),
        ));
    }

    apply_edits(body, edits)
}

/// Find the byte range of the raw destination inside the source text of an
/// inline link.
///
/// The destination is read as written, escapes and all: `<...>` without the
/// brackets, otherwise up to whitespace or the unbalanced closing `)`.
fn locate_destination(link_source: &str) -> Option<Range<usize>> {
    let open = link_source.rfind("](")? + 2;
    let rest = &link_source[open..];
    let start = open + (rest.len() - rest.trim_start().len());
    let dest = &link_source[start..];

    if let Some(inner) = dest.strip_prefix('<') {
        let end = inner.find('>')?;
        return (end > 0).then_some(start + 1..start + 1 + end);
    }

    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in dest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            ')' => return (i > 0).then_some(start..start + i),
            c if c.is_whitespace() => return (i > 0).then_some(start..start + i),
            _ => {}
        }
    }
    None
}

/// Apply non-overlapping edits given in ascending order.
fn apply_edits(text: &str, edits: Vec<(Range<usize>, String)>) -> String {
    if edits.is_empty() {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        out.push_str(&text[cursor..range.start]);
        out.push_str(&replacement);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
