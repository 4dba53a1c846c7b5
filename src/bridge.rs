//! Stdio host bridge.
//!
//! Runs the panel as a long-lived process. The host writes one JSON message
//! per line to stdin and reads one JSON event per line from stdout:
//!
//! ```text
//! -> {"command": "generateCommitMessage"}
//! <- {"type": "render", "state": {...}, "html": "<!DOCTYPE html>..."}
//! -> {"command": "copy", "text": "feat: add x"}
//! <- {"type": "notice", "level": "info", "message": "Copied to clipboard!"}
//! ```
//!
//! End of input drains in-flight requests and returns.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{BridgeError, RenderError};
use crate::generate::Generator;
use crate::git::DiffSource;
use crate::panel::{
    Clipboard, Host, HostCommand, HtmlRenderer, Notice, NoticeLevel, Orchestrator, PanelMessage,
    PanelSnapshot,
};
use crate::staged_list::{ListNode, StagedChangesView};
use crate::watcher::{RepoEvent, StagedChangeWatcher};

/// Kind of repository event forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepoEventKind {
    StateChanged,
    RepositoryOpened,
}

/// Messages only the host (not the panel) sends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostMessage {
    GenerateCommitMessage,
    GeneratePrDescription,
    RepoEvent {
        event: RepoEventKind,
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

/// Any line the bridge accepts on its input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Inbound {
    Panel(PanelMessage),
    Host(HostMessage),
}

/// Events written to the bridge output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outbound {
    Render {
        state: PanelSnapshot,
        #[serde(skip_serializing_if = "Option::is_none")]
        html: Option<String>,
    },
    Notice {
        level: NoticeLevel,
        message: String,
    },
    StagedChanges {
        nodes: Vec<ListNode>,
    },
}

/// [`Host`] that serializes every update as a JSON line.
pub struct BridgeHost<W: Write + Send> {
    out: W,
    renderer: HtmlRenderer,
}

impl<W: Write + Send> BridgeHost<W> {
    pub fn new(out: W, renderer: HtmlRenderer) -> Self {
        Self { out, renderer }
    }

    pub fn emit(&mut self, event: &Outbound) -> Result<(), BridgeError> {
        serde_json::to_writer(&mut self.out, event).map_err(BridgeError::Encode)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    fn emit_logged(&mut self, event: &Outbound) {
        if let Err(e) = self.emit(event) {
            warn!("{}", e);
        }
    }
}

impl<W: Write + Send> Host for BridgeHost<W> {
    fn render(&mut self, snapshot: &PanelSnapshot) {
        let html = match self.renderer.render(snapshot) {
            Ok(html) => Some(html),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };
        self.emit_logged(&Outbound::Render {
            state: snapshot.clone(),
            html,
        });
    }

    fn notify(&mut self, notice: Notice) {
        self.emit_logged(&Outbound::Notice {
            level: notice.level,
            message: notice.message,
        });
    }
}

/// The panel, the watcher and the staged list wired to one JSON-lines stream.
pub struct Bridge<W: Write + Send> {
    orchestrator: Orchestrator<BridgeHost<W>>,
    watcher: StagedChangeWatcher,
    changes: mpsc::Receiver<()>,
    list: StagedChangesView,
}

impl<W: Write + Send> Bridge<W> {
    pub fn new(
        diffs: Arc<dyn DiffSource>,
        generator: Arc<dyn Generator>,
        clipboard: Box<dyn Clipboard>,
        workspace: Option<PathBuf>,
        out: W,
    ) -> Result<Self, RenderError> {
        let host = BridgeHost::new(out, HtmlRenderer::new()?);
        let list = StagedChangesView::new(Arc::clone(&diffs));
        let orchestrator = Orchestrator::new(diffs, generator, clipboard, host);
        let (mut watcher, changes) = StagedChangeWatcher::new(workspace);
        if let Err(e) = watcher.bind() {
            info!("Staging index not watched yet: {}", e);
        }
        Ok(Self {
            orchestrator,
            watcher,
            changes,
            list,
        })
    }

    /// Process input until it ends, then wait for in-flight requests.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> Result<(), BridgeError> {
        self.refresh_list().await;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => self.handle_line(&line).await,
                    None => break,
                },
                Some(completion) = self.orchestrator.next_completion(), if self.orchestrator.pending() > 0 => {
                    self.orchestrator.apply(completion);
                }
                Some(()) = self.changes.recv() => self.refresh_list().await,
            }
        }

        self.orchestrator.settle().await;
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let inbound: Inbound = match serde_json::from_str(line) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!("Ignoring unrecognized message: {}", e);
                return;
            }
        };

        match inbound {
            Inbound::Panel(message) => self.orchestrator.handle_message(message).await,
            Inbound::Host(HostMessage::GenerateCommitMessage) => {
                self.orchestrator
                    .run_command(HostCommand::GenerateCommitMessage)
                    .await
            }
            Inbound::Host(HostMessage::GeneratePrDescription) => {
                self.orchestrator
                    .run_command(HostCommand::GeneratePrDescription)
                    .await
            }
            Inbound::Host(HostMessage::RepoEvent { event, path }) => {
                let event = match event {
                    RepoEventKind::RepositoryOpened => RepoEvent::RepositoryOpened(path),
                    RepoEventKind::StateChanged => RepoEvent::StateChanged,
                };
                self.watcher.handle_repo_event(event);
            }
        }
    }

    async fn refresh_list(&mut self) {
        let nodes = self.list.refresh().await.to_vec();
        self.orchestrator
            .host_mut()
            .emit_logged(&Outbound::StagedChanges { nodes });
    }
}
