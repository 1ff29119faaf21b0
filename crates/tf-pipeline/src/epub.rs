//! EPUB build with Pandoc.
//!
//! Steps, each writing one artifact into the build directory:
//!
//! 1. combine chapters → `text_combined.txt`
//! 2. normalize pymdown syntax with the Lua filter → `pandoc.md`
//! 3. render metadata → `book_meta.yml`
//! 4. build the book → `text_book.epub`

use std::path::{Path, PathBuf};
use std::process::Command;

use tf_combine::CombineWarning;
use tf_config::Config;

use crate::assets::{DataDir, EPUB_CSS, LUA_FILTER, META_TEMPLATE};
use crate::book::combine_to_file;
use crate::edition::Edition;
use crate::epub_meta::write_epub_metadata;
use crate::error::{PipelineError, io_error};
use crate::tools::{ToolPaths, run};

/// Cover image location inside the docs directory.
const COVER_IMAGE: &str = "img/cover.jpg";

/// Files produced by the EPUB pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpubArtifacts {
    /// Combined chapters.
    pub combined: PathBuf,
    /// Pandoc-flavored markdown.
    pub normalized: PathBuf,
    /// EPUB metadata.
    pub metadata: PathBuf,
    /// The book.
    pub epub: PathBuf,
    /// Warnings raised while combining chapters.
    pub warnings: Vec<CombineWarning>,
}

impl EpubArtifacts {
    /// Artifact paths inside `build_dir`.
    #[must_use]
    pub fn in_dir(build_dir: &Path) -> Self {
        Self {
            combined: build_dir.join("text_combined.txt"),
            normalized: build_dir.join("pandoc.md"),
            metadata: build_dir.join("book_meta.yml"),
            epub: build_dir.join("text_book.epub"),
            warnings: Vec::new(),
        }
    }
}

/// Runs the EPUB pipeline for one site.
#[derive(Debug)]
pub struct EpubBuilder<'a> {
    config: &'a Config,
    tools: ToolPaths,
    data: DataDir,
}

impl<'a> EpubBuilder<'a> {
    /// Create a builder, locating the data directory from the config.
    #[must_use]
    pub fn new(config: &'a Config, tools: ToolPaths) -> Self {
        let data = DataDir::discover(config.plugin.data_dir.as_deref());
        Self { config, tools, data }
    }

    /// Use an explicit data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data: DataDir) -> Self {
        self.data = data;
        self
    }

    /// Run all steps, writing artifacts into `build_dir`.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error. Artifacts of earlier steps
    /// are left in place.
    pub fn build(&self, build_dir: &Path) -> Result<EpubArtifacts, PipelineError> {
        std::fs::create_dir_all(build_dir).map_err(io_error(build_dir))?;
        let mut artifacts = EpubArtifacts::in_dir(build_dir);

        // Assets are checked up front so a missing file fails before any tool runs.
        let lua_filter = self.data.require(LUA_FILTER)?;
        let css = self.data.require(EPUB_CSS)?;

        let document = combine_to_file(self.config, &artifacts.combined)?;
        tracing::info!(chapters = document.chapters.len(), "Combined markdown saved");
        artifacts.warnings = document.warnings;

        self.normalize(&artifacts.combined, &artifacts.normalized, &lua_filter)?;
        tracing::info!(path = %artifacts.normalized.display(), "Normalized markdown saved");

        let edition = Edition::from_git(&self.tools.git, self.config.config_dir());
        write_epub_metadata(
            self.config,
            self.data.optional(META_TEMPLATE).as_deref(),
            &artifacts.metadata,
            &edition.label(&self.config.locale),
            &edition.iso_date(),
        )?;

        self.pandoc_epub(&artifacts, &css)?;
        tracing::info!(path = %artifacts.epub.display(), "EPUB saved");

        Ok(artifacts)
    }

    /// Convert pymdown blocks to Pandoc fenced divs.
    fn normalize(&self, input: &Path, output: &Path, lua_filter: &Path) -> Result<(), PipelineError> {
        run(
            "pandoc",
            Command::new(&self.tools.pandoc)
                .arg(input)
                .args(["--from", "markdown", "--to", "markdown", "--lua-filter"])
                .arg(lua_filter)
                .arg("--output")
                .arg(output),
        )?;
        Ok(())
    }

    fn pandoc_epub(&self, artifacts: &EpubArtifacts, css: &Path) -> Result<(), PipelineError> {
        let mut command = Command::new(&self.tools.pandoc);
        command
            .arg(&artifacts.normalized)
            .args([
                "--from",
                "markdown+smart",
                "--to",
                "epub3",
                "--standalone",
                "--toc",
                "--toc-depth=2",
                "--metadata-file",
            ])
            .arg(&artifacts.metadata)
            .arg("--resource-path")
            .arg(&self.config.docs_dir)
            .arg("--css")
            .arg(css)
            .arg("--output")
            .arg(&artifacts.epub);

        let cover = self.config.docs_dir.join(COVER_IMAGE);
        if cover.is_file() {
            command.arg("--epub-cover-image").arg(cover);
        }

        run("pandoc", &mut command)?;
        Ok(())
    }
}
