//! Generation slots and the aggregate panel state.

use serde::Serialize;

use crate::generate::EndpointKind;

/// Prefix shared by every placeholder text.
const PLACEHOLDER_PREFIX: &str = "AI-generated";

/// One independently tracked generation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotId {
    Commit,
    Description,
    BranchOrIssue,
}

impl SlotId {
    pub const ALL: [SlotId; 3] = [SlotId::Commit, SlotId::Description, SlotId::BranchOrIssue];

    /// Text shown before anything has been generated.
    pub fn placeholder(&self) -> &'static str {
        match self {
            SlotId::Commit => "AI-generated commit message will appear here.",
            SlotId::Description => "AI-generated PR description will appear here.",
            SlotId::BranchOrIssue => "AI-generated branch or issue name will appear here.",
        }
    }

    /// The slot an endpoint's output lands in.
    pub fn for_endpoint(endpoint: EndpointKind) -> Self {
        match endpoint {
            EndpointKind::CommitMessage => SlotId::Commit,
            EndpointKind::PrDescription => SlotId::Description,
            EndpointKind::BranchName | EndpointKind::IssueName => SlotId::BranchOrIssue,
        }
    }
}

/// Whether `text` carries nothing worth copying.
pub fn is_placeholder_text(text: &str) -> bool {
    text.trim().is_empty() || text.starts_with(PLACEHOLDER_PREFIX)
}

/// Fixed slot content after a failed generation.
pub fn error_text(endpoint: EndpointKind) -> String {
    format!("Error generating {}.", endpoint.noun())
}

/// Content and loading flag of one slot.
///
/// Fields are only mutated through [`Slot::begin_loading`] and
/// [`Slot::finish`], which keep the pair consistent: a loading slot is
/// always empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: SlotId,
    content: String,
    is_loading: bool,
}

impl Slot {
    fn new(id: SlotId) -> Self {
        Self {
            id,
            content: id.placeholder().to_string(),
            is_loading: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_placeholder(&self) -> bool {
        !self.is_loading && is_placeholder_text(&self.content)
    }

    pub(crate) fn begin_loading(&mut self) {
        self.content.clear();
        self.is_loading = true;
    }

    pub(crate) fn finish(&mut self, content: String) {
        self.content = content;
        self.is_loading = false;
    }

    fn view(&self) -> SlotView {
        let is_placeholder = self.is_placeholder();
        let content = if is_placeholder && self.content.trim().is_empty() {
            self.id.placeholder().to_string()
        } else {
            self.content.clone()
        };
        SlotView {
            content,
            is_loading: self.is_loading,
            is_placeholder,
        }
    }
}

/// All slots, owned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    commit: Slot,
    description: Slot,
    branch_or_issue: Slot,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            commit: Slot::new(SlotId::Commit),
            description: Slot::new(SlotId::Description),
            branch_or_issue: Slot::new(SlotId::BranchOrIssue),
        }
    }

    pub fn slot(&self, id: SlotId) -> &Slot {
        match id {
            SlotId::Commit => &self.commit,
            SlotId::Description => &self.description,
            SlotId::BranchOrIssue => &self.branch_or_issue,
        }
    }

    pub(crate) fn slot_mut(&mut self, id: SlotId) -> &mut Slot {
        match id {
            SlotId::Commit => &mut self.commit,
            SlotId::Description => &mut self.description,
            SlotId::BranchOrIssue => &mut self.branch_or_issue,
        }
    }

    /// Whether any slot is waiting on the backend.
    pub fn any_loading(&self) -> bool {
        SlotId::ALL.iter().any(|id| self.slot(*id).is_loading())
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            commit: self.commit.view(),
            description: self.description.view(),
            branch_or_issue: self.branch_or_issue.view(),
        }
    }
}

/// Serializable view of one slot as the display surface shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub content: String,
    pub is_loading: bool,
    pub is_placeholder: bool,
}

/// Full state snapshot pushed to the display surface on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub commit: SlotView,
    pub description: SlotView,
    pub branch_or_issue: SlotView,
}
