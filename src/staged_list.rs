//! Staged changes list view.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::git::DiffSource;

/// Label of the single node shown when nothing is staged.
pub const NO_STAGED_CHANGES_LABEL: &str = "No staged changes found.";

/// One row of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ListNode {
    File { path: String },
    Placeholder { label: String },
}

/// Build the rows for a path listing, in git's order.
pub fn nodes_for(paths: Option<Vec<String>>) -> Vec<ListNode> {
    match paths {
        Some(paths) if !paths.is_empty() => paths
            .into_iter()
            .map(|path| ListNode::File { path })
            .collect(),
        _ => vec![ListNode::Placeholder {
            label: NO_STAGED_CHANGES_LABEL.to_string(),
        }],
    }
}

/// Staged file list, re-read from git on every refresh.
pub struct StagedChangesView {
    source: Arc<dyn DiffSource>,
    nodes: Vec<ListNode>,
}

impl StagedChangesView {
    pub fn new(source: Arc<dyn DiffSource>) -> Self {
        Self {
            source,
            nodes: nodes_for(None),
        }
    }

    pub fn nodes(&self) -> &[ListNode] {
        &self.nodes
    }

    pub async fn refresh(&mut self) -> &[ListNode] {
        let paths = self.source.staged_file_paths().await;
        self.nodes = nodes_for(paths);
        debug!("Staged changes list: {} node(s)", self.nodes.len());
        &self.nodes
    }
}
