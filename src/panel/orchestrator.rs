//! The generation orchestrator.
//!
//! Owns the panel state, validates user intents, extracts diffs, spawns one
//! backend call per accepted request and folds results back into the slots.
//! Requests are never cancelled or de-duplicated: when two requests for the
//! same slot overlap, whichever completes last decides the slot content.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::error::{GenerationError, PanelError};
use crate::generate::{EndpointKind, Generator, Payload};
use crate::git::DiffSource;

use super::host::{Clipboard, Host, Notice};
use super::message::{GenerationRequest, HostCommand, PanelMessage, RequestSource};
use super::state::{PanelState, SlotId, error_text, is_placeholder_text};

/// Result of one backend call, delivered back to the orchestrator.
#[derive(Debug)]
pub struct Completion {
    pub slot: SlotId,
    pub endpoint: EndpointKind,
    pub result: Result<String, GenerationError>,
}

/// Single owner of all slot state.
pub struct Orchestrator<H: Host> {
    state: PanelState,
    diffs: Arc<dyn DiffSource>,
    generator: Arc<dyn Generator>,
    clipboard: Box<dyn Clipboard>,
    host: H,
    in_flight: JoinSet<Completion>,
}

impl<H: Host> Orchestrator<H> {
    /// Create the orchestrator and push the initial placeholder state.
    pub fn new(
        diffs: Arc<dyn DiffSource>,
        generator: Arc<dyn Generator>,
        clipboard: Box<dyn Clipboard>,
        host: H,
    ) -> Self {
        let mut orchestrator = Self {
            state: PanelState::new(),
            diffs,
            generator,
            clipboard,
            host,
            in_flight: JoinSet::new(),
        };
        orchestrator.push();
        orchestrator
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Number of backend calls that have not been applied yet.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Run one of the host's argument-less commands.
    pub async fn run_command(&mut self, command: HostCommand) {
        self.submit(GenerationRequest::from(command)).await;
    }

    /// Handle a message posted by the display surface.
    pub async fn handle_message(&mut self, message: PanelMessage) {
        debug!("Panel message: {:?}", message);
        match message {
            PanelMessage::Copy { text } => {
                if let Err(e) = self.copy(&text) {
                    self.report(&e);
                }
            }
            PanelMessage::GenerateBranchFromText { text } => {
                self.submit(GenerationRequest::from_text(EndpointKind::BranchName, text))
                    .await
            }
            PanelMessage::GenerateBranchFromChanges => {
                self.submit(GenerationRequest::from_changes(EndpointKind::BranchName))
                    .await
            }
            PanelMessage::GenerateIssueName { text } => {
                self.submit(GenerationRequest::from_text(EndpointKind::IssueName, text))
                    .await
            }
        }
    }

    /// Validate and start a generation request.
    ///
    /// Rejected requests surface a notice and leave the state untouched.
    pub async fn submit(&mut self, request: GenerationRequest) {
        if let Err(e) = self.start(request).await {
            self.report(&e);
        }
    }

    async fn start(&mut self, request: GenerationRequest) -> Result<(), PanelError> {
        let slot = request.slot();
        let endpoint = request.kind;
        let missing = request.missing_input();

        let payload = match request.source {
            RequestSource::FreeText(_) if !endpoint.accepts_text() => {
                return Err(PanelError::TextNotAccepted(endpoint));
            }
            RequestSource::FreeText(text) => {
                if text.trim().is_empty() {
                    return Err(PanelError::ValidationFailed(missing));
                }
                Payload::Text(text)
            }
            RequestSource::StagedDiff => {
                if !self.diffs.has_workspace() {
                    return Err(PanelError::NoWorkspace);
                }
                let diff = self
                    .diffs
                    .staged_diff()
                    .await
                    .ok_or(PanelError::NoStagedChanges)?;
                Payload::Diff(diff)
            }
        };

        self.state.slot_mut(slot).begin_loading();
        self.push();

        let generator = Arc::clone(&self.generator);
        self.in_flight.spawn(async move {
            let result = generator.generate(endpoint, payload).await;
            Completion {
                slot,
                endpoint,
                result,
            }
        });
        debug!("Started {} request ({} in flight)", endpoint, self.in_flight.len());
        Ok(())
    }

    /// Wait for the next backend call to finish.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        loop {
            match self.in_flight.join_next().await? {
                Ok(completion) => return Some(completion),
                Err(e) => error!("Generation task failed: {}", e),
            }
        }
    }

    /// Fold a finished backend call into its slot.
    pub fn apply(&mut self, completion: Completion) {
        let Completion {
            slot,
            endpoint,
            result,
        } = completion;

        match result {
            Ok(text) => {
                self.state.slot_mut(slot).finish(text);
                self.push();
            }
            Err(e) => {
                warn!("{}", e);
                self.state.slot_mut(slot).finish(error_text(endpoint));
                self.push();
                self.report(&PanelError::GenerationFailed(endpoint));
            }
        }
    }

    /// Apply every in-flight call as it completes.
    pub async fn settle(&mut self) {
        while let Some(completion) = self.next_completion().await {
            self.apply(completion);
        }
    }

    fn copy(&mut self, text: &str) -> Result<(), PanelError> {
        if is_placeholder_text(text) {
            return Err(PanelError::CopyRejected);
        }
        self.clipboard
            .write_text(text)
            .map_err(PanelError::Clipboard)?;
        self.host.notify(Notice::info("Copied to clipboard!"));
        Ok(())
    }

    fn report(&mut self, error: &PanelError) {
        debug!("Notice: {}", error);
        self.host.notify(Notice::from(error));
    }

    fn push(&mut self) {
        let snapshot = self.state.snapshot();
        self.host.render(&snapshot);
    }
}
