//! AEGIS Content Bridge
//!
//! The per-tab injected component. It answers exactly two inbound request
//! kinds (`Ping`, `TogglePanel`) and owns the floating panel's lifecycle
//! on the host page: creation, drag, resize, removal. At most one panel
//! exists per tab at a time.

mod bridge;
mod host;
mod messages;
mod panel;

pub use bridge::ContentBridge;
pub use host::{DocumentListener, HostPage, NodeId, NodeKind, Viewport};
pub use messages::{
    BridgeEvent, BridgeRequest, BridgeResponse, FrameAction, FrameId, FrameMessage, TabId,
};
pub use panel::{DragSession, PanelGeometry, PanelState, ResizeSession};
