//! Repository discovery for the staging-index watch.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::WatchError;

/// File name of git's staging index inside the git directory.
pub const INDEX_FILE_NAME: &str = "index";

/// Locate the git directory for the repository containing `workspace`.
///
/// Works for worktrees and submodules too, where `.git` is a file pointing
/// elsewhere.
pub fn discover_git_dir(workspace: &Path) -> Result<PathBuf, WatchError> {
    let repo = Repository::discover(workspace)
        .map_err(|_| WatchError::NoRepository(workspace.display().to_string()))?;
    Ok(repo.path().to_path_buf())
}
