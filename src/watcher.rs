//! Staged-change watcher.
//!
//! Two independent sources feed one coalescing channel:
//! - repository events forwarded by the host's VCS integration;
//! - a filesystem watch on the git directory, filtered to the staging index.
//!
//! The channel holds at most one pending signal, so bursts collapse into a
//! single refresh for the consumer.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::WatchError;
use crate::git::{INDEX_FILE_NAME, discover_git_dir};

/// An event from the host's VCS integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoEvent {
    /// Repository state changed (index, HEAD, refs...).
    StateChanged,
    /// A repository was opened or initialized, at the given path when known.
    RepositoryOpened(Option<PathBuf>),
}

/// Whether a filesystem event touches the staging index.
pub fn is_index_event(event: &Event) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name().and_then(|n| n.to_str()) == Some(INDEX_FILE_NAME))
}

/// Emits "staged changes may have changed" signals.
pub struct StagedChangeWatcher {
    workspace: Option<PathBuf>,
    tx: mpsc::Sender<()>,
    index_watch: Option<(PathBuf, RecommendedWatcher)>,
}

impl StagedChangeWatcher {
    /// Create an unbound watcher and the receiving end of its signals.
    pub fn new(workspace: Option<PathBuf>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (
            Self {
                workspace,
                tx,
                index_watch: None,
            },
            rx,
        )
    }

    /// Git directory currently watched, if any.
    pub fn git_dir(&self) -> Option<&Path> {
        self.index_watch.as_ref().map(|(dir, _)| dir.as_path())
    }

    pub fn is_bound(&self) -> bool {
        self.index_watch.is_some()
    }

    /// Start watching the workspace repository's index. No-op when bound.
    pub fn bind(&mut self) -> Result<(), WatchError> {
        if self.is_bound() {
            return Ok(());
        }
        let Some(workspace) = self.workspace.clone() else {
            return Err(WatchError::NoRepository("<no workspace>".to_string()));
        };
        self.bind_at(&workspace)
    }

    fn bind_at(&mut self, path: &Path) -> Result<(), WatchError> {
        let git_dir = discover_git_dir(path)?;

        let tx = self.tx.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) if is_index_event(&event) => {
                    debug!("Index event: {:?}", event.kind);
                    let _ = tx.try_send(());
                }
                Ok(_) => {}
                Err(e) => warn!("Index watch error: {}", e),
            }
        })?;
        watcher.watch(&git_dir, RecursiveMode::NonRecursive)?;

        info!("Watching staging index in {}", git_dir.display());
        self.index_watch = Some((git_dir, watcher));
        Ok(())
    }

    /// Feed an event from the host's VCS integration.
    ///
    /// A newly opened repository retries binding when nothing is bound yet,
    /// at the event's path or else at the workspace.
    pub fn handle_repo_event(&mut self, event: RepoEvent) {
        debug!("Repository event: {:?}", event);
        if let RepoEvent::RepositoryOpened(path) = &event {
            if !self.is_bound() {
                let result = match path {
                    Some(path) => self.bind_at(path),
                    None => self.bind(),
                };
                if let Err(e) = result {
                    warn!("Could not watch newly opened repository: {}", e);
                }
            }
        }
        self.signal();
    }

    /// Queue a refresh; collapses into any refresh already pending.
    pub fn signal(&self) {
        let _ = self.tx.try_send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_index_events_are_relevant() {
        assert!(is_index_event(&event(
            EventKind::Modify(ModifyKind::Any),
            "/repo/.git/index"
        )));
        assert!(is_index_event(&event(
            EventKind::Create(CreateKind::File),
            "/repo/.git/index"
        )));
        assert!(is_index_event(&event(
            EventKind::Remove(RemoveKind::File),
            "/repo/.git/index"
        )));
    }

    #[test]
    fn test_other_events_are_ignored() {
        assert!(!is_index_event(&event(
            EventKind::Modify(ModifyKind::Any),
            "/repo/.git/index.lock"
        )));
        assert!(!is_index_event(&event(
            EventKind::Modify(ModifyKind::Any),
            "/repo/.git/HEAD"
        )));
        assert!(!is_index_event(&event(
            EventKind::Access(AccessKind::Any),
            "/repo/.git/index"
        )));
    }

    #[tokio::test]
    async fn test_signals_coalesce() {
        let (watcher, mut rx) = StagedChangeWatcher::new(None);
        watcher.signal();
        watcher.signal();
        watcher.signal();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_state_changed_signals() {
        let (mut watcher, mut rx) = StagedChangeWatcher::new(None);
        watcher.handle_repo_event(RepoEvent::StateChanged);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_bind_without_workspace_fails() {
        let (mut watcher, _rx) = StagedChangeWatcher::new(None);
        assert!(matches!(watcher.bind(), Err(WatchError::NoRepository(_))));
        assert!(!watcher.is_bound());
    }

    #[test]
    fn test_bind_without_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (mut watcher, _rx) = StagedChangeWatcher::new(Some(dir.path().to_path_buf()));
        assert!(watcher.bind().is_err());
        assert!(watcher.git_dir().is_none());
    }

    #[test]
    fn test_repository_opened_binds_later() {
        let dir = tempfile::tempdir().unwrap();
        let (mut watcher, mut rx) = StagedChangeWatcher::new(Some(dir.path().to_path_buf()));
        assert!(watcher.bind().is_err());

        git2::Repository::init(dir.path()).unwrap();
        watcher.handle_repo_event(RepoEvent::RepositoryOpened(Some(dir.path().to_path_buf())));

        assert!(watcher.is_bound());
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_repository_opened_without_path_binds_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let (mut watcher, mut rx) = StagedChangeWatcher::new(Some(dir.path().to_path_buf()));
        assert!(watcher.bind().is_err());

        git2::Repository::init(dir.path()).unwrap();
        watcher.handle_repo_event(RepoEvent::RepositoryOpened(None));

        assert!(watcher.is_bound());
        assert!(rx.try_recv().is_ok());
    }
}
