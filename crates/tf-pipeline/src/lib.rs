//! Build pipeline for text-forge sites.
//!
//! This crate provides:
//! - [`combine_book`]: chapters of a configured site as one manuscript
//! - [`EpubBuilder`]: combined text → Pandoc → `text_book.epub`
//! - [`write_epub_metadata`]: `book_meta.yml` from a placeholder template
//! - [`build_site`]: EPUB, then MkDocs site and root redirect
//!
//! External tools are located through [`ToolPaths`]; bundled Lua filter, CSS
//! and metadata template through [`DataDir`].
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use tf_config::Config;
//! use tf_pipeline::{EpubBuilder, ToolPaths};
//!
//! let config = Config::load(Some(Path::new("mkdocs.yml")), None)?;
//! let artifacts = EpubBuilder::new(&config, ToolPaths::from_env()).build(Path::new("build"))?;
//! println!("{}", artifacts.epub.display());
//! # Ok(())
//! # }
//! ```

mod assets;
mod book;
mod edition;
mod epub;
mod epub_meta;
mod error;
mod site;
mod tools;

pub use assets::{DATA_DIR_ENV, DataDir, EPUB_CSS, LUA_FILTER, META_TEMPLATE};
pub use book::{combine_book, combine_options, combine_to_file};
pub use edition::{Edition, long_date};
pub use epub::{EpubArtifacts, EpubBuilder};
pub use epub_meta::{BookMeta, DEFAULT_TEMPLATE, write_epub_metadata};
pub use error::PipelineError;
pub use site::{
    SiteOptions, SiteReport, build_mkdocs_site, build_site, copy_build_artifacts,
    create_root_redirect,
};
pub use tools::{GIT_ENV, PANDOC_ENV, PYTHON_ENV, ToolPaths};
