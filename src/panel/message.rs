//! Messages crossing the panel boundary and the requests they turn into.

use serde::Deserialize;

use crate::error::MissingInput;
use crate::generate::EndpointKind;

use super::state::SlotId;

/// Messages emitted by the display surface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    Copy {
        #[serde(default)]
        text: String,
    },
    GenerateBranchFromText {
        #[serde(default)]
        text: String,
    },
    GenerateBranchFromChanges,
    GenerateIssueName {
        #[serde(default)]
        text: String,
    },
}

/// Argument-less commands registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    GenerateCommitMessage,
    GeneratePrDescription,
}

/// Where a request takes its input from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSource {
    StagedDiff,
    FreeText(String),
}

/// A single user-triggered generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: EndpointKind,
    pub source: RequestSource,
}

impl GenerationRequest {
    pub fn from_changes(kind: EndpointKind) -> Self {
        Self {
            kind,
            source: RequestSource::StagedDiff,
        }
    }

    pub fn from_text(kind: EndpointKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            source: RequestSource::FreeText(text.into()),
        }
    }

    pub fn slot(&self) -> SlotId {
        SlotId::for_endpoint(self.kind)
    }

    /// The input to complain about when free text is blank.
    pub fn missing_input(&self) -> MissingInput {
        match self.kind {
            EndpointKind::IssueName => MissingInput::IssueDescription,
            _ => MissingInput::BranchDescription,
        }
    }
}

impl From<HostCommand> for GenerationRequest {
    fn from(command: HostCommand) -> Self {
        match command {
            HostCommand::GenerateCommitMessage => {
                GenerationRequest::from_changes(EndpointKind::CommitMessage)
            }
            HostCommand::GeneratePrDescription => {
                GenerationRequest::from_changes(EndpointKind::PrDescription)
            }
        }
    }
}
