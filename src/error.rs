//! Error types for codescribe modules using thiserror.

use thiserror::Error;

use crate::generate::EndpointKind;

/// Errors from the generation backend client.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Cannot build URL for {endpoint}: {detail}")]
    InvalidUrl {
        endpoint: EndpointKind,
        detail: String,
    },

    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: EndpointKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {endpoint} timed out after {secs} seconds")]
    Timeout { endpoint: EndpointKind, secs: u64 },

    #[error("Backend returned HTTP {status} for {endpoint}: {body}")]
    Status {
        endpoint: EndpointKind,
        status: u16,
        body: String,
    },

    #[error("Backend returned an unreadable response for {endpoint}: {detail}")]
    InvalidResponse {
        endpoint: EndpointKind,
        detail: String,
    },

    #[error("Backend response for {endpoint} has no '{field}' field")]
    MissingField {
        endpoint: EndpointKind,
        field: &'static str,
    },
}

impl GenerationError {
    /// The endpoint the failed call was addressed to.
    pub fn endpoint(&self) -> EndpointKind {
        match self {
            GenerationError::InvalidUrl { endpoint, .. }
            | GenerationError::Request { endpoint, .. }
            | GenerationError::Timeout { endpoint, .. }
            | GenerationError::Status { endpoint, .. }
            | GenerationError::InvalidResponse { endpoint, .. }
            | GenerationError::MissingField { endpoint, .. } => *endpoint,
        }
    }
}

/// Input a free-text generation action was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    BranchDescription,
    IssueDescription,
}

impl MissingInput {
    pub fn prompt(&self) -> &'static str {
        match self {
            MissingInput::BranchDescription => "Please describe the branch you want to create.",
            MissingInput::IssueDescription => "Please describe the issue you want to name.",
        }
    }
}

/// User-facing panel failures. The Display text is the notice shown to the user.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("No workspace folder open.")]
    NoWorkspace,

    #[error("No staged changes found or not a Git repository.")]
    NoStagedChanges,

    #[error("Failed to generate {}.", .0.noun())]
    GenerationFailed(EndpointKind),

    #[error("{}", .0.prompt())]
    ValidationFailed(MissingInput),

    #[error("A {} can only be generated from staged changes.", .0.noun())]
    TextNotAccepted(EndpointKind),

    #[error("Nothing to copy yet.")]
    CopyRejected,

    #[error("Failed to copy to clipboard: {0}")]
    Clipboard(#[from] ClipboardError),
}

/// Errors from the system clipboard.
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(#[source] arboard::Error),

    #[error("write failed: {0}")]
    Write(#[source] arboard::Error),
}

/// Errors from the staged-change watcher.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("No git repository found at {0}")]
    NoRepository(String),

    #[error("Failed to watch staging index: {0}")]
    Notify(#[from] notify::Error),
}

/// Errors from configuration resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidBackendUrl { url: String, reason: String },
}

/// Errors from the stdio host bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode bridge event: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors from rendering the panel markup.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to generate CSP nonce: {0}")]
    Nonce(getrandom::Error),

    #[error("Invalid panel template: {0}")]
    Template(#[source] Box<handlebars::TemplateError>),

    #[error("Failed to render panel: {0}")]
    Render(#[source] Box<handlebars::RenderError>),
}
