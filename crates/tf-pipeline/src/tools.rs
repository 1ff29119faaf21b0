//! External tool invocation.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::error::PipelineError;

/// Environment variable overriding the `pandoc` executable.
pub const PANDOC_ENV: &str = "TEXT_FORGE_PANDOC";
/// Environment variable overriding the Python interpreter used for MkDocs.
pub const PYTHON_ENV: &str = "TEXT_FORGE_PYTHON";
/// Environment variable overriding the `git` executable.
pub const GIT_ENV: &str = "TEXT_FORGE_GIT";

/// Executables used by the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolPaths {
    /// Pandoc.
    pub pandoc: PathBuf,
    /// Python interpreter with MkDocs installed.
    pub python: PathBuf,
    /// Git.
    pub git: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pandoc: PathBuf::from("pandoc"),
            python: PathBuf::from("python3"),
            git: PathBuf::from("git"),
        }
    }
}

impl ToolPaths {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let pick = |var: &str, default: PathBuf| {
            std::env::var_os(var)
                .filter(|v| !v.is_empty())
                .map_or(default, PathBuf::from)
        };
        Self {
            pandoc: pick(PANDOC_ENV, defaults.pandoc),
            python: pick(PYTHON_ENV, defaults.python),
            git: pick(GIT_ENV, defaults.git),
        }
    }
}

/// Run a prepared command and require a successful exit.
///
/// `tool` names the program in errors and logs.
pub(crate) fn run(tool: &str, command: &mut Command) -> Result<Output, PipelineError> {
    tracing::debug!(tool, command = ?command, "Running external tool");

    let output = command
        .output()
        .map_err(|source| PipelineError::ToolNotFound {
            tool: tool.to_owned(),
            source,
        })?;

    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool: tool.to_owned(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(output)
}

/// Run a command and return its trimmed stdout, or `None` on any failure.
pub(crate) fn capture(program: &OsStr, args: &[&str], dir: &std::path::Path) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_names() {
        let tools = ToolPaths::default();
        assert_eq!(tools.pandoc, PathBuf::from("pandoc"));
        assert_eq!(tools.python, PathBuf::from("python3"));
        assert_eq!(tools.git, PathBuf::from("git"));
    }

    #[test]
    fn test_from_env_override() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var(PANDOC_ENV, "/opt/pandoc/bin/pandoc");
        }
        let tools = ToolPaths::from_env();
        unsafe {
            std::env::remove_var(PANDOC_ENV);
        }
        assert_eq!(tools.pandoc, PathBuf::from("/opt/pandoc/bin/pandoc"));
    }

    #[test]
    fn test_missing_program_is_tool_not_found() {
        let err = run(
            "nonexistent",
            &mut Command::new("text-forge-definitely-missing-tool"),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::ToolNotFound { ref tool, .. } if tool == "nonexistent"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_stderr() {
        let err = run(
            "sh",
            Command::new("sh").args(["-c", "echo broken >&2; exit 3"]),
        )
        .unwrap_err();

        match err {
            PipelineError::ToolFailed { tool, stderr, .. } => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_trims_stdout() {
        let dir = std::env::temp_dir();
        assert_eq!(
            capture(OsStr::new("sh"), &["-c", "echo '  v1.0  '"], &dir).as_deref(),
            Some("v1.0")
        );
        assert!(capture(OsStr::new("sh"), &["-c", "exit 1"], &dir).is_none());
    }
}
