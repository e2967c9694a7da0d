//! The per-tab bridge instance

use crate::host::{DocumentListener, HostPage, NodeId, NodeKind, Viewport};
use crate::messages::{
    BridgeEvent, BridgeRequest, BridgeResponse, FrameAction, FrameId, FrameMessage, TabId,
};
use crate::panel::{DragSession, PanelGeometry, PanelState, ResizeSession};

/// DOM id of the fixed-layer panel container.
pub const CONTAINER_ID: &str = "aegis-floating-panel-container";

/// Extension-internal resource loaded into the embedded frame.
pub const PANEL_DOCUMENT: &str = "panel/index.html";

const EXTENSION_SCHEME_PREFIX: &str = "chrome-extension://";

struct Panel {
    container: NodeId,
    frame: FrameId,
    state: PanelState,
}

/// One bridge per tab. Owns the panel lifecycle and the bridge's entire
/// footprint on the host page.
pub struct ContentBridge {
    tab_id: TabId,
    page: HostPage,
    panel: Option<Panel>,
}

impl ContentBridge {
    pub fn new(tab_id: TabId, viewport: Viewport) -> Self {
        let mut page = HostPage::new(viewport);
        // Injected once at script start; deliberately outlives the panel.
        page.attach(NodeKind::StyleSheet, None, None);

        tracing::debug!(tab_id = %tab_id, "Content bridge loaded");

        Self {
            tab_id,
            page,
            panel: None,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    /// The two-message inbound contract: `Ping` proves liveness,
    /// `TogglePanel` flips the panel.
    pub fn handle_request(&mut self, request: BridgeRequest) -> BridgeResponse {
        match request {
            BridgeRequest::Ping => BridgeResponse::Pong,
            BridgeRequest::TogglePanel => {
                if self.is_open() {
                    self.close_panel();
                } else {
                    self.open_panel();
                }
                BridgeResponse::Toggled { success: true }
            }
        }
    }

    /// Fire-and-forget events have no response; the bridge only records
    /// them (the embedded document is the real consumer and is out of
    /// scope here).
    pub fn handle_event(&self, event: BridgeEvent) {
        match event {
            BridgeEvent::SignInSucceeded { data } => {
                tracing::debug!(tab_id = %self.tab_id, email = %data.email, "Sign-in succeeded");
            }
            BridgeEvent::SignInFailed { message } => {
                tracing::debug!(tab_id = %self.tab_id, %message, "Sign-in failed");
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    pub fn geometry(&self) -> Option<PanelGeometry> {
        self.panel.as_ref().map(|panel| panel.state.geometry)
    }

    pub fn frame_id(&self) -> Option<FrameId> {
        self.panel.as_ref().map(|panel| panel.frame)
    }

    pub fn listener_count(&self) -> usize {
        self.page.listener_count()
    }

    pub fn container_node_count(&self) -> usize {
        self.page.nodes_under(CONTAINER_ID)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.page.set_viewport(viewport);
    }

    fn open_panel(&mut self) {
        if self.panel.is_some() {
            return;
        }

        let container = self
            .page
            .attach(NodeKind::Container, Some(CONTAINER_ID), None);
        self.page.attach(NodeKind::Frame, None, Some(container));
        self.page
            .attach(NodeKind::ResizeHandle, None, Some(container));

        // The frame message listener lives as long as the panel does.
        self.page.add_listener(DocumentListener::FrameMessage);

        let frame = FrameId::mint();
        self.panel = Some(Panel {
            container,
            frame,
            state: PanelState::default(),
        });

        tracing::debug!(tab_id = %self.tab_id, source = PANEL_DOCUMENT, "Panel opened");
    }

    fn close_panel(&mut self) {
        let Some(panel) = self.panel.take() else {
            return;
        };

        self.page.remove_subtree(panel.container);
        for listener in [
            DocumentListener::DragMove,
            DocumentListener::DragEnd,
            DocumentListener::ResizeMove,
            DocumentListener::ResizeEnd,
            DocumentListener::FrameMessage,
        ] {
            self.page.remove_listener(listener);
        }

        tracing::debug!(tab_id = %self.tab_id, "Panel closed");
    }

    /// Pointer press on the host page. A press in the header starts a
    /// drag; a press on the corner handle starts a resize.
    pub fn pointer_down(&mut self, px: f64, py: f64) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let geometry = panel.state.geometry;

        // The handle overlaps the panel body; check it first.
        if geometry.in_resize_handle(px, py) {
            panel.state.resize = Some(ResizeSession::begin(&geometry, px, py));
            self.page.add_listener(DocumentListener::ResizeMove);
            self.page.add_listener(DocumentListener::ResizeEnd);
        } else if geometry.in_header(px, py) {
            panel.state.drag = Some(DragSession::begin(&geometry, px, py));
            self.page.add_listener(DocumentListener::DragMove);
            self.page.add_listener(DocumentListener::DragEnd);
        }
    }

    pub fn pointer_move(&mut self, px: f64, py: f64) {
        let viewport = self.page.viewport();
        let Some(panel) = self.panel.as_mut() else {
            return;
        };

        if let Some(drag) = panel.state.drag {
            if self.page.has_listener(DocumentListener::DragMove) {
                let (x, y) = drag.drag_to(&panel.state.geometry, viewport, px, py);
                panel.state.geometry.x = x;
                panel.state.geometry.y = y;
            }
        }

        if let Some(resize) = panel.state.resize {
            if self.page.has_listener(DocumentListener::ResizeMove) {
                let (width, height) = resize.resize_to(&panel.state.geometry, px, py);
                panel.state.geometry.width = width;
                panel.state.geometry.height = height;
            }
        }
    }

    pub fn pointer_up(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };

        if panel.state.drag.take().is_some() {
            self.page.remove_listener(DocumentListener::DragMove);
            self.page.remove_listener(DocumentListener::DragEnd);
        }
        if panel.state.resize.take().is_some() {
            self.page.remove_listener(DocumentListener::ResizeMove);
            self.page.remove_listener(DocumentListener::ResizeEnd);
        }
    }

    /// A message claiming to come from the embedded sub-document. Honored
    /// only when the sender's identity matches the frame this bridge
    /// opened; a compromised host page cannot spoof navigation or close
    /// commands.
    pub fn handle_frame_message(&mut self, source: FrameId, message: FrameMessage) -> FrameAction {
        let Some(panel) = self.panel.as_ref() else {
            return FrameAction::Ignored;
        };

        if !self.page.has_listener(DocumentListener::FrameMessage) {
            return FrameAction::Ignored;
        }

        if panel.frame != source {
            tracing::warn!(tab_id = %self.tab_id, "Frame message from unknown source; ignoring");
            return FrameAction::Ignored;
        }

        match message {
            FrameMessage::Navigate { url } => {
                if url.starts_with(EXTENSION_SCHEME_PREFIX) {
                    FrameAction::LoadInFrame(url)
                } else {
                    FrameAction::OpenTab(url)
                }
            }
            FrameMessage::ClosePanel => {
                self.close_panel();
                FrameAction::PanelClosed
            }
        }
    }
}
