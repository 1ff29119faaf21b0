//! Structural scan of a chapter body.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Markdown extensions recognized when scanning chapters.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Level-1 heading that opens a chapter.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LeadingHeading {
    /// Explicit `{#id}` of the heading.
    pub id: Option<String>,
    /// Whether the heading carries an attribute block (`{...}`).
    pub has_attributes: bool,
    /// Byte offset where an attribute block would be appended.
    pub attribute_offset: usize,
    /// Byte offset just past the heading's final line.
    pub end: usize,
}

/// Headings relevant to anchor placement.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Outline {
    /// The heading, if the chapter starts with an H1 (after any HTML comments).
    pub leading: Option<LeadingHeading>,
    /// Explicit heading ids, in document order.
    pub ids: Vec<String>,
}

/// Scan a chapter body for its leading H1 and explicit heading ids.
pub(crate) fn outline(body: &str) -> Outline {
    let mut outline = Outline::default();
    let mut preamble = true;
    let mut in_comment = false;

    for (event, range) in Parser::new_ext(body, markdown_options()).into_offset_iter() {
        match &event {
            Event::Start(Tag::HtmlBlock) if preamble && is_comment(&body[range.clone()]) => {
                in_comment = true;
                continue;
            }
            Event::End(TagEnd::HtmlBlock) if in_comment => {
                in_comment = false;
                continue;
            }
            _ if in_comment => continue,
            _ => {}
        }
        let is_first = std::mem::replace(&mut preamble, false);
        let Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) = event
        else {
            continue;
        };

        if is_first && level == HeadingLevel::H1 {
            outline.leading = Some(LeadingHeading {
                id: id.as_deref().map(str::to_owned),
                has_attributes: id.is_some() || !classes.is_empty() || !attrs.is_empty(),
                attribute_offset: attribute_offset(body, &range),
                end: line_end(body, range.end),
            });
        }
        if let Some(id) = id {
            outline.ids.push((*id).to_owned());
        }
    }

    outline
}

/// Check whether an HTML block consists of comments only.
fn is_comment(block: &str) -> bool {
    let mut rest = block.trim();
    while let Some(after_open) = rest.strip_prefix("<!--") {
        let Some(close) = after_open.find("-->") else {
            return false;
        };
        rest = after_open[close + 3..].trim_start();
    }
    rest.is_empty()
}

/// Offset at the end of the heading text line, before trailing whitespace
/// and an ATX closing sequence.
fn attribute_offset(body: &str, range: &Range<usize>) -> usize {
    let source = &body[range.start..range.end];
    let atx = source.trim_start().starts_with('#');

    let mut lines: Vec<(usize, &str)> = Vec::new();
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        lines.push((offset, line));
        offset += line.len();
    }
    while lines.len() > 1 && lines.last().is_some_and(|(_, l)| l.trim().is_empty()) {
        lines.pop();
    }

    // Setext headings end with the `===` underline; the text sits above it.
    let index = if atx { 0 } else { lines.len().saturating_sub(2) };
    let Some(&(line_start, line)) = lines.get(index) else {
        return range.start;
    };

    let mut text = line.trim_end();
    if atx {
        let without_closing = text.trim_end_matches('#');
        if without_closing.len() < text.len()
            && without_closing.ends_with([' ', '\t'])
        {
            text = without_closing.trim_end();
        }
    }
    range.start + line_start + text.len()
}

/// Offset just past the line containing `offset - 1`.
fn line_end(body: &str, offset: usize) -> usize {
    if offset == 0 || body[..offset].ends_with('\n') {
        return offset;
    }
    body[offset..]
        .find('\n')
        .map_or(body.len(), |i| offset + i + 1)
}
