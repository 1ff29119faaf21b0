//! Chapter anchor assignment.
//!
//! Every chapter gets one anchor in the combined document. The default is
//! the slug of the file's base name (`chapter1.md` → `chapter1-md`); an
//! `anchor` front matter value overrides it. Anchors are claimed in
//! navigation order and a later chapter that collides receives `-2`, `-3`, …
//!
//! Explicit heading ids (`## Quotes {#quotes}`) share the namespace, so they
//! are reserved before any chapter claims its anchor.

use std::collections::{HashMap, HashSet};

/// Slug used when a name has no alphanumeric characters at all.
const FALLBACK_SLUG: &str = "chapter";

/// Convert a name to an anchor slug.
///
/// Lower-cases the name and collapses every run of non-alphanumeric
/// characters into a single hyphen. Leading and trailing hyphens are dropped.
///
/// # Examples
///
/// ```
/// use tf_combine::slugify;
///
/// assert_eq!(slugify("chapter1.md"), "chapter1-md");
/// assert_eq!(slugify("My  Notes (draft).md"), "my-notes-draft-md");
/// assert_eq!(slugify("Глава 1.md"), "глава-1-md");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        slug
    }
}

/// Anchor assigned to one chapter.
#[derive(Clone, Debug, PartialEq, Eq)]
struct AnchorEntry {
    path: String,
    anchor: String,
    sub_anchors: HashSet<String>,
}

/// Mapping from chapter path to its unique anchor in the combined document.
///
/// Built once, before any link is rewritten, and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnchorTable {
    entries: Vec<AnchorEntry>,
    by_path: HashMap<String, usize>,
}

impl AnchorTable {
    /// Anchor assigned to a chapter path.
    #[must_use]
    pub fn anchor(&self, path: &str) -> Option<&str> {
        self.by_path
            .get(path)
            .map(|&i| self.entries[i].anchor.as_str())
    }

    /// Resolve a link target to the anchor it should point at.
    ///
    /// A fragment the target chapter declares is kept; any other fragment
    /// falls back to the chapter anchor. Returns `None` for unknown paths.
    #[must_use]
    pub fn resolve(&self, path: &str, fragment: Option<&str>) -> Option<String> {
        let entry = &self.entries[*self.by_path.get(path)?];
        match fragment {
            Some(frag) if frag == entry.anchor || entry.sub_anchors.contains(frag) => {
                Some(frag.to_owned())
            }
            _ => Some(entry.anchor.clone()),
        }
    }

    /// Number of chapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(path, anchor)` pairs in navigation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.path.as_str(), e.anchor.as_str()))
    }
}

/// Check whether `anchor` can be written as a Pandoc `{#id}` attribute.
pub(crate) fn is_valid_anchor(anchor: &str) -> bool {
    !anchor.is_empty()
        && !anchor
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '{' | '}' | '"' | '\'' | '='))
}

/// Builder claiming anchors in navigation order.
#[derive(Debug, Default)]
pub struct AnchorTableBuilder {
    table: AnchorTable,
    taken: HashSet<String>,
    /// Heading ids declared in chapters, with the chapter allowed to reuse
    /// the id as its own anchor (its leading heading).
    reserved: HashMap<String, Option<String>>,
}

impl AnchorTableBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an explicit heading id declared somewhere in the document.
    ///
    /// Only `owner` may still claim `id` as its chapter anchor. An id
    /// reserved by two different chapters cannot be claimed by either.
    pub fn reserve(&mut self, id: &str, owner: Option<&str>) {
        let owner = owner.map(str::to_owned);
        self.reserved
            .entry(id.to_owned())
            .and_modify(|existing| {
                if *existing != owner {
                    *existing = None;
                }
            })
            .or_insert(owner);
    }

    /// Register the next chapter in navigation order.
    ///
    /// `anchor_override` replaces the base-name slug. `sub_anchors` are the
    /// explicit heading ids the chapter defines. Returns the assigned anchor.
    /// Registering a path twice keeps the first assignment.
    pub fn push(
        &mut self,
        path: &str,
        anchor_override: Option<&str>,
        sub_anchors: Vec<String>,
    ) -> String {
        if let Some(existing) = self.table.anchor(path) {
            return existing.to_owned();
        }

        let base = match anchor_override.map(str::trim).filter(|a| !a.is_empty()) {
            Some(explicit) => explicit.to_owned(),
            None => slugify(path.rsplit('/').next().unwrap_or(path)),
        };
        let anchor = self.claim(path, base);

        self.table
            .by_path
            .insert(path.to_owned(), self.table.entries.len());
        self.table.entries.push(AnchorEntry {
            path: path.to_owned(),
            anchor: anchor.clone(),
            sub_anchors: sub_anchors.into_iter().collect(),
        });
        anchor
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> AnchorTable {
        self.table
    }

    fn is_free(&self, path: &str, candidate: &str) -> bool {
        !self.taken.contains(candidate)
            && self
                .reserved
                .get(candidate)
                .is_none_or(|owner| owner.as_deref() == Some(path))
    }

    fn claim(&mut self, path: &str, base: String) -> String {
        if self.is_free(path, &base) {
            self.taken.insert(base.clone());
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.is_free(path, &candidate) {
                self.taken.insert(candidate.clone());
                tracing::debug!(anchor = %base, assigned = %candidate, "Anchor collision, suffixing");
                return candidate;
            }
            n += 1;
        }
    }
}
