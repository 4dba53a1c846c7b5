//! The four backend endpoints and their request payloads.

use std::fmt;

use serde::Serialize;

/// One of the backend's generation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    CommitMessage,
    PrDescription,
    BranchName,
    IssueName,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 4] = [
        EndpointKind::CommitMessage,
        EndpointKind::PrDescription,
        EndpointKind::BranchName,
        EndpointKind::IssueName,
    ];

    /// Path relative to the backend base URL.
    pub fn path(&self) -> &'static str {
        match self {
            EndpointKind::CommitMessage => "api/generate-commit",
            EndpointKind::PrDescription => "api/generate-description",
            EndpointKind::BranchName => "api/generate-branch-name",
            EndpointKind::IssueName => "api/generate-issue-name",
        }
    }

    /// JSON field of the response body holding the generated text.
    pub fn response_field(&self) -> &'static str {
        match self {
            EndpointKind::CommitMessage => "commitMessage",
            EndpointKind::PrDescription => "prDescription",
            EndpointKind::BranchName => "branchName",
            EndpointKind::IssueName => "issueName",
        }
    }

    /// Human-readable name used in notices and slot error text.
    pub fn noun(&self) -> &'static str {
        match self {
            EndpointKind::CommitMessage => "commit message",
            EndpointKind::PrDescription => "PR description",
            EndpointKind::BranchName => "branch name",
            EndpointKind::IssueName => "issue name",
        }
    }

    /// Whether the endpoint accepts free text in place of a diff.
    pub fn accepts_text(&self) -> bool {
        matches!(self, EndpointKind::BranchName | EndpointKind::IssueName)
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Request body: serializes to `{"diff": ...}` or `{"text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Diff(String),
    Text(String),
}

impl Payload {
    /// Size of the diff or text in bytes, for logging.
    pub fn byte_len(&self) -> usize {
        match self {
            Payload::Diff(s) | Payload::Text(s) => s.len(),
        }
    }
}
