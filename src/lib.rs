//! codescribe - turns staged git changes into AI-generated text.
//!
//! # Overview
//!
//! codescribe reads the staged diff with the system `git`, sends it (or a
//! free-text description) to a generation backend, and keeps three output
//! slots (commit message, PR description, branch/issue name) in sync with a
//! sandboxed display surface. A watcher on the staging index keeps the staged
//! file list fresh.

pub mod bridge;
pub mod config;
pub mod error;
pub mod generate;
pub mod git;
pub mod panel;
pub mod staged_list;
pub mod watcher;

// Re-export commonly used types
pub use config::Config;
pub use error::{
    BridgeError, ClipboardError, ConfigError, GenerationError, MissingInput, PanelError,
    RenderError, WatchError,
};
pub use generate::{EndpointKind, Generator, HttpGenerator, Payload};
pub use git::{DiffSource, GitCli};
pub use panel::{
    Host, HostCommand, HtmlRenderer, Notice, NoticeLevel, Orchestrator, PanelMessage,
    PanelSnapshot, SlotId,
};
pub use staged_list::{ListNode, StagedChangesView};
pub use watcher::{RepoEvent, StagedChangeWatcher};
