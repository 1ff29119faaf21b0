//! Static site build around MkDocs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tf_config::Config;

use crate::epub::{EpubArtifacts, EpubBuilder};
use crate::error::{PipelineError, io_error};
use crate::tools::{ToolPaths, run};

/// Options of the full site build.
#[derive(Clone, Debug)]
pub struct SiteOptions {
    /// Site output directory; the config's `site_dir` when `None`.
    pub site_dir: Option<PathBuf>,
    /// Pass `--strict` to MkDocs.
    pub strict: bool,
    /// Copy the EPUB and combined text into `docs/assets` before building.
    pub copy_artifacts: bool,
    /// Write a redirect `index.html` next to the site directory.
    pub create_redirect: bool,
    /// Target of the root redirect.
    pub redirect_target: String,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            site_dir: None,
            strict: true,
            copy_artifacts: true,
            create_redirect: true,
            redirect_target: "/ru/".to_owned(),
        }
    }
}

/// Outcome of a full build.
#[derive(Clone, Debug)]
pub struct SiteReport {
    /// EPUB pipeline artifacts.
    pub artifacts: EpubArtifacts,
    /// Built site directory.
    pub site_dir: PathBuf,
    /// Written redirect page, if any.
    pub redirect: Option<PathBuf>,
}

/// Build the EPUB, then the site.
///
/// # Errors
///
/// Returns the first failing step's error.
pub fn build_site(
    config: &Config,
    build_dir: &Path,
    tools: &ToolPaths,
    options: &SiteOptions,
) -> Result<SiteReport, PipelineError> {
    let config_path = config
        .config_path
        .as_deref()
        .ok_or(PipelineError::NoConfigFile)?;

    let artifacts = EpubBuilder::new(config, tools.clone()).build(build_dir)?;

    if options.copy_artifacts {
        copy_build_artifacts(build_dir, &config.docs_dir)?;
    }

    let site_dir = options
        .site_dir
        .clone()
        .unwrap_or_else(|| config.site_dir.clone());
    build_mkdocs_site(tools, config_path, &site_dir, options.strict)?;

    let redirect = if options.create_redirect {
        Some(create_root_redirect(&site_dir, &options.redirect_target)?)
    } else {
        None
    };

    Ok(SiteReport {
        artifacts,
        site_dir,
        redirect,
    })
}

/// Run `python -m mkdocs build`.
///
/// # Errors
///
/// Returns [`PipelineError::ToolFailed`] if MkDocs fails.
pub fn build_mkdocs_site(
    tools: &ToolPaths,
    config_path: &Path,
    site_dir: &Path,
    strict: bool,
) -> Result<(), PipelineError> {
    tracing::info!(site_dir = %site_dir.display(), strict, "Building MkDocs site");

    let mut command = Command::new(&tools.python);
    command
        .args(["-m", "mkdocs", "build", "--config-file"])
        .arg(config_path)
        .arg("--site-dir")
        .arg(site_dir);
    if strict {
        command.arg("--strict");
    }
    run("mkdocs", &mut command)?;
    Ok(())
}

/// Copy the EPUB and combined text into `<docs_dir>/assets`.
///
/// Missing artifacts are skipped. Returns the copied destinations.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if a copy fails.
pub fn copy_build_artifacts(build_dir: &Path, docs_dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let assets_dir = docs_dir.join("assets");
    std::fs::create_dir_all(&assets_dir).map_err(io_error(&assets_dir))?;

    let artifacts = EpubArtifacts::in_dir(build_dir);
    let mut copied = Vec::new();
    for source in [&artifacts.epub, &artifacts.combined] {
        if !source.is_file() {
            continue;
        }
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = assets_dir.join(name);
        std::fs::copy(source, &target).map_err(io_error(&target))?;
        tracing::info!(path = %target.display(), "Copied build artifact");
        copied.push(target);
    }
    Ok(copied)
}

/// Write `index.html` redirecting to `target` in the parent of `site_dir`.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the file cannot be written.
pub fn create_root_redirect(site_dir: &Path, target: &str) -> Result<PathBuf, PipelineError> {
    let public_dir = site_dir.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(public_dir).map_err(io_error(public_dir))?;

    let path = public_dir.join("index.html");
    std::fs::write(&path, redirect_html(target)).map_err(io_error(&path))?;
    tracing::info!(path = %path.display(), target, "Created root redirect");
    Ok(path)
}

fn redirect_html(target: &str) -> String {
    format!(
        concat!(
            r#"<!DOCTYPE html><html><head><meta charset="utf-8">"#,
            r#"<meta http-equiv="refresh" content="0; url={t}">"#,
            r#"<link rel="canonical" href="{t}">"#,
            r"<title>Redirecting to {t}</title></head>",
            r#"<body><p>Redirecting to <a href="{t}">{t}</a>...</p>"#,
            r#"<script>window.location.href="{t}";</script></body></html>"#,
        ),
        t = target
    )
}
