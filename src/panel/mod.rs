//! The AI outputs panel: slot state, message protocol, rendering and the
//! orchestrator that ties them to git and the backend.

pub mod host;
pub mod message;
pub mod orchestrator;
pub mod render;
pub mod state;

pub use host::{Clipboard, Host, Notice, NoticeLevel, SystemClipboard};
pub use message::{GenerationRequest, HostCommand, PanelMessage, RequestSource};
pub use orchestrator::{Completion, Orchestrator};
pub use render::HtmlRenderer;
pub use state::{PanelSnapshot, PanelState, Slot, SlotId, SlotView};
