//! Chapter combination for text-forge.
//!
//! Turns a site navigation tree and the markdown chapters it references into
//! one manuscript suitable for Pandoc:
//!
//! - [`NavEntry`]: navigation tree, flattened depth-first into chapter order
//! - [`AnchorTable`]: unique anchor per chapter, assigned before any rewriting
//! - Link rewriting: `[text](other.md)` becomes `[text](#other-md)`
//! - Chapter dates: `created`/`published` front matter rendered as a
//!   `/// chapter-dates` block
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use tf_combine::{CombineOptions, Combiner, FsSource, NavEntry};
//!
//! let source = FsSource::new(PathBuf::from("docs"));
//! let nav = vec![
//!     NavEntry::page(Some("Home"), "index.md"),
//!     NavEntry::page(Some("Chapter 1"), "chapter1.md"),
//! ];
//! let combined = Combiner::new(&source, CombineOptions::default()).combine(Some(nav.as_slice()))?;
//! combined.write_to("build/text_combined.txt")?;
//! # Ok(())
//! # }
//! ```

mod anchor;
mod chapter;
mod combiner;
mod dates;
mod error;
mod front_matter;
mod links;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod nav;
mod source;

pub use anchor::{AnchorTable, AnchorTableBuilder, slugify};
pub use combiner::{ChapterSummary, CombineOptions, CombinedDocument, Combiner, default_output};
pub use dates::{CHAPTER_DATES_TAG, DateLabels};
pub use error::{CombineError, CombineWarning};
pub use front_matter::FrontMatter;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;
pub use nav::{NavEntry, NavLeaf, flatten, parse_nav};
pub use source::{ChapterSource, FsSource, SourceError};
