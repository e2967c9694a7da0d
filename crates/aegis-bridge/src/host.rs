//! Host page footprint
//!
//! The bridge's view of the document it was injected into: which nodes it
//! attached and which document-level listeners it registered. Repeated
//! open/close cycles must return both counts to zero under the panel
//! container, or the bridge is leaking into the host page.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Fixed-layer panel container.
    Container,
    /// Embedded sub-document loaded from an extension resource.
    Frame,
    ResizeHandle,
    /// Style element injected once at bridge start; outlives the panel.
    StyleSheet,
}

/// Document-level listeners the bridge may hold. Listeners attached to the
/// bridge's own nodes are torn down with the node subtree and are not
/// tracked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentListener {
    DragMove,
    DragEnd,
    ResizeMove,
    ResizeEnd,
    /// Cross-document message listener for the embedded frame.
    FrameMessage,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    dom_id: Option<&'static str>,
    parent: Option<NodeId>,
}

#[derive(Debug)]
pub struct HostPage {
    viewport: Viewport,
    nodes: HashMap<NodeId, Node>,
    listeners: HashSet<DocumentListener>,
}

impl HostPage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            nodes: HashMap::new(),
            listeners: HashSet::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn attach(
        &mut self,
        kind: NodeKind,
        dom_id: Option<&'static str>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(Uuid::new_v4());
        self.nodes.insert(
            id,
            Node {
                kind,
                dom_id,
                parent,
            },
        );
        id
    }

    /// Detach a node and everything under it.
    pub fn remove_subtree(&mut self, root: NodeId) {
        let children: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent == Some(root))
            .map(|(id, _)| *id)
            .collect();

        for child in children {
            self.remove_subtree(child);
        }
        self.nodes.remove(&root);
    }

    pub fn add_listener(&mut self, listener: DocumentListener) {
        self.listeners.insert(listener);
    }

    pub fn remove_listener(&mut self, listener: DocumentListener) {
        self.listeners.remove(&listener);
    }

    pub fn has_listener(&self, listener: DocumentListener) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Count the node carrying `dom_id` plus all of its descendants.
    pub fn nodes_under(&self, dom_id: &str) -> usize {
        let Some(root) = self
            .nodes
            .iter()
            .find(|(_, node)| node.dom_id == Some(dom_id))
            .map(|(id, _)| *id)
        else {
            return 0;
        };

        let mut count = 0;
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend(
                self.nodes
                    .iter()
                    .filter(|(_, node)| node.parent == Some(current))
                    .map(|(id, _)| *id),
            );
        }
        count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(&id).map(|node| node.kind)
    }
}
