//! Staged diff and staged path extraction.
//!
//! All operations shell out to the system `git` binary in the workspace root.
//! Failures never surface as errors: a missing workspace, a missing `git`, a
//! directory that is not a repository and an empty index all collapse into
//! `None`, which callers treat as "no staged changes".

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Source of staged-change information.
///
/// This abstraction allows mocking git in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiffSource: Send + Sync {
    /// Whether a workspace folder is open at all.
    fn has_workspace(&self) -> bool;

    /// Unified diff of staged changes, `None` when there is nothing to diff.
    async fn staged_diff(&self) -> Option<String>;

    /// Paths of staged files in git's output order, `None` on any failure.
    async fn staged_file_paths(&self) -> Option<Vec<String>>;
}

/// [`DiffSource`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    workspace: Option<PathBuf>,
}

impl GitCli {
    pub fn new(workspace: Option<PathBuf>) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> Option<&Path> {
        self.workspace.as_deref()
    }
}

#[async_trait]
impl DiffSource for GitCli {
    fn has_workspace(&self) -> bool {
        self.workspace.is_some()
    }

    async fn staged_diff(&self) -> Option<String> {
        let cwd = self.workspace.as_deref()?;
        let stdout = run_git(cwd, &["diff", "--staged"]).await?;

        if stdout.trim().is_empty() {
            debug!("Staged diff is empty");
            return None;
        }

        debug!("Staged diff: {} bytes", stdout.len());
        Some(stdout)
    }

    async fn staged_file_paths(&self) -> Option<Vec<String>> {
        let cwd = self.workspace.as_deref()?;
        let stdout = run_git(cwd, &["diff", "--staged", "--name-only"]).await?;
        Some(parse_name_only(&stdout))
    }
}

/// Check if git is installed and accessible.
pub fn check_git_installed() -> bool {
    which::which("git").is_ok()
}

/// Split `git diff --name-only` output into paths, dropping empty lines.
pub fn parse_name_only(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run git in `cwd` and return stdout, or `None` if it could not run or failed.
async fn run_git(cwd: &Path, args: &[&str]) -> Option<String> {
    let output = match Command::new("git")
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            warn!("Failed to run git {}: {}", args.join(" "), e);
            return None;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(
            "git {} exited with {:?}: {}",
            args.join(" "),
            output.status.code(),
            stderr.trim()
        );
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}
