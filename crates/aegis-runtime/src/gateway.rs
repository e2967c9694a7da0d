//! Channel-backed tab gateway
//!
//! Each injected tab gets its own task owning a [`ContentBridge`]; the
//! gateway talks to it over an mpsc channel. A tab with no bridge task has
//! no channel, so requests to it fail exactly like a dead channel, which
//! is the signal the coordinator's ping probe relies on.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use url::Url;

use aegis_core::{
    BridgeEvent, BridgeRequest, BridgeResponse, ContentBridge, GatewayError, TabGateway, TabId,
    Viewport, RESTRICTED_SCHEMES,
};

const ENVELOPE_BUFFER: usize = 16;

const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

enum BridgeEnvelope {
    Request {
        request: BridgeRequest,
        reply: oneshot::Sender<BridgeResponse>,
    },
    Event(BridgeEvent),
    Inspect {
        reply: oneshot::Sender<BridgeStatus>,
    },
}

/// Snapshot of a bridge's footprint on its tab.
#[derive(Debug, Clone, Copy)]
pub struct BridgeStatus {
    pub panel_open: bool,
    pub listener_count: usize,
    pub container_node_count: usize,
}

struct TabEntry {
    url: String,
    bridge: Option<mpsc::Sender<BridgeEnvelope>>,
}

#[derive(Default)]
pub struct ChannelTabs {
    tabs: RwLock<HashMap<TabId, TabEntry>>,
}

impl ChannelTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_tab(&self, tab: TabId, url: &str) {
        self.tabs.write().insert(
            tab,
            TabEntry {
                url: url.to_string(),
                bridge: None,
            },
        );
    }

    /// Closing the tab drops the bridge channel; the bridge task exits
    /// when its receiver drains.
    pub fn close_tab(&self, tab: TabId) {
        self.tabs.write().remove(&tab);
    }

    pub fn has_bridge(&self, tab: TabId) -> bool {
        self.tabs
            .read()
            .get(&tab)
            .map(|entry| entry.bridge.is_some())
            .unwrap_or(false)
    }

    pub async fn bridge_status(&self, tab: TabId) -> Option<BridgeStatus> {
        let sender = self.bridge_sender(tab)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        sender
            .send(BridgeEnvelope::Inspect { reply: reply_tx })
            .await
            .ok()?;
        reply_rx.await.ok()
    }

    fn bridge_sender(&self, tab: TabId) -> Option<mpsc::Sender<BridgeEnvelope>> {
        self.tabs.read().get(&tab).and_then(|entry| entry.bridge.clone())
    }

    fn run_bridge(tab: TabId, mut rx: mpsc::Receiver<BridgeEnvelope>) {
        tokio::spawn(async move {
            let mut bridge = ContentBridge::new(tab, DEFAULT_VIEWPORT);

            while let Some(envelope) = rx.recv().await {
                match envelope {
                    BridgeEnvelope::Request { request, reply } => {
                        let _ = reply.send(bridge.handle_request(request));
                    }
                    BridgeEnvelope::Event(event) => bridge.handle_event(event),
                    BridgeEnvelope::Inspect { reply } => {
                        let _ = reply.send(BridgeStatus {
                            panel_open: bridge.is_open(),
                            listener_count: bridge.listener_count(),
                            container_node_count: bridge.container_node_count(),
                        });
                    }
                }
            }

            tracing::debug!(tab_id = %tab, "Bridge task exited");
        });
    }
}

#[async_trait]
impl TabGateway for ChannelTabs {
    async fn request(
        &self,
        tab: TabId,
        request: BridgeRequest,
    ) -> Result<BridgeResponse, GatewayError> {
        let Some(sender) = self.bridge_sender(tab) else {
            return Err(GatewayError::Unreachable(tab));
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        sender
            .send(BridgeEnvelope::Request {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| GatewayError::Unreachable(tab))?;
        reply_rx.await.map_err(|_| GatewayError::Unreachable(tab))
    }

    async fn send_event(&self, tab: TabId, event: BridgeEvent) {
        let Some(sender) = self.bridge_sender(tab) else {
            tracing::debug!(tab_id = %tab, "Event dropped; no bridge in tab");
            return;
        };
        if sender.send(BridgeEnvelope::Event(event)).await.is_err() {
            tracing::debug!(tab_id = %tab, "Event dropped; bridge task is gone");
        }
    }

    async fn inject(&self, tab: TabId) -> Result<(), GatewayError> {
        let mut tabs = self.tabs.write();
        let Some(entry) = tabs.get_mut(&tab) else {
            return Err(GatewayError::Unreachable(tab));
        };

        // The browser's own refusal wording for pages it will not touch.
        match Url::parse(&entry.url) {
            Ok(url) if RESTRICTED_SCHEMES.contains(&url.scheme()) => {
                return Err(GatewayError::Injection(format!(
                    "Cannot access a {}:// URL",
                    url.scheme()
                )));
            }
            Ok(_) => {}
            Err(_) => {
                return Err(GatewayError::Injection(
                    "Cannot access contents of the page".to_string(),
                ));
            }
        }

        if entry.bridge.is_some() {
            tracing::debug!(tab_id = %tab, "Bridge already injected");
            return Ok(());
        }

        let (tx, rx) = mpsc::channel(ENVELOPE_BUFFER);
        Self::run_bridge(tab, rx);
        entry.bridge = Some(tx);

        tracing::info!(tab_id = %tab, "Bridge injected");
        Ok(())
    }
}
