//! Collaborators the orchestrator drives: the display surface, the notice
//! area and the clipboard.

use serde::Serialize;

use crate::error::{ClipboardError, PanelError};

use super::state::PanelSnapshot;

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

impl From<&PanelError> for Notice {
    fn from(error: &PanelError) -> Self {
        let level = match error {
            PanelError::NoStagedChanges => NoticeLevel::Info,
            PanelError::ValidationFailed(_)
            | PanelError::TextNotAccepted(_)
            | PanelError::CopyRejected => NoticeLevel::Warning,
            PanelError::NoWorkspace
            | PanelError::GenerationFailed(_)
            | PanelError::Clipboard(_) => NoticeLevel::Error,
        };
        Self {
            level,
            message: error.to_string(),
        }
    }
}

/// The display surface plus the host's notice area.
pub trait Host: Send {
    /// Replace whatever is displayed with `snapshot`.
    fn render(&mut self, snapshot: &PanelSnapshot);

    fn notify(&mut self, notice: Notice);
}

/// Clipboard write access.
#[cfg_attr(test, mockall::automock)]
pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via arboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(ClipboardError::Unavailable)?;
        clipboard
            .set_text(text.to_string())
            .map_err(ClipboardError::Write)
    }
}
