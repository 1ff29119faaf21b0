//! Translation file checks for text-forge theme overrides.
//!
//! Two file shapes are understood:
//!
//! - multi-language, `{"en": {...}, "ru": {...}}`: every language must have
//!   the keys of the first one
//! - flat, `{"key": "text"}`: keys referenced from templates
//!   (`data-i18n="key"`, `data-i18n-title="key"`) and scripts (`t('key')`)
//!   must be defined
//!
//! Flat files can also be fixed: unused keys removed, and hardcoded `title`
//! and `placeholder` attributes replaced by generated keys.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::{Path, PathBuf};
//! use tf_i18n::{CheckOptions, check_translations};
//!
//! let options = CheckOptions {
//!     base_path: Some(PathBuf::from("mkdocs/overrides")),
//!     ..CheckOptions::default()
//! };
//! let report = check_translations(Path::new("mkdocs/overrides/i18n.json"), &options)?;
//! for issue in &report.issues {
//!     println!("{issue}");
//! }
//! # Ok(())
//! # }
//! ```

mod check;
mod error;
mod hardcoded;
mod scan;

pub use check::{CheckOptions, CheckReport, Issue, Layout, check_translations};
pub use error::I18nError;
pub use hardcoded::{Attribute, HardcodedString, find_hardcoded_strings, generate_translation_key};
pub use scan::KeyScanner;
