//! Staged-change extraction via the system `git` binary.

pub mod repo;
pub mod staged;

pub use repo::{INDEX_FILE_NAME, discover_git_dir};
pub use staged::{DiffSource, GitCli, check_git_installed, parse_name_only};
