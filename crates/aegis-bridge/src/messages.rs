//! Bridge message vocabulary
//!
//! Every cross-context exchange is a tagged union with a defined response
//! type, or an explicit fire-and-forget event. No sentinel values signal
//! "response pending".

use aegis_auth::SignInData;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Browser tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// Identity of the panel's embedded sub-document. Frame messages are only
/// honored when the sender presents the identity minted at panel open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(Uuid);

impl FrameId {
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Coordinator → bridge requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeRequest {
    /// Liveness probe.
    Ping,
    /// Open the panel if closed, close it if open.
    TogglePanel,
}

/// Replies to [`BridgeRequest`], one variant per request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeResponse {
    Pong,
    Toggled { success: bool },
}

/// Coordinator → bridge fire-and-forget events. No response exists for
/// these by contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeEvent {
    SignInSucceeded { data: SignInData },
    SignInFailed { message: String },
}

/// Messages originating from the embedded sub-document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameMessage {
    Navigate { url: String },
    ClosePanel,
}

/// What the bridge decided to do with a frame message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameAction {
    /// Extension-internal URL: load it inside the embedded frame.
    LoadInFrame(String),
    /// External URL: open a new browser tab.
    OpenTab(String),
    PanelClosed,
    /// Message came from an unknown source or arrived with no panel open.
    Ignored,
}
