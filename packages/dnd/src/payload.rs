//! Drag payloads as handed over by the gesture layer

use easel_document::NodeId;
use serde::{Deserialize, Serialize};

/// Where the dragged nodes came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragOrigin {
    /// Nodes already attached to the document being edited
    Document,

    /// Detached nodes built from a palette or library entry
    Library,
}

/// The dragged nodes plus their origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSource {
    pub nodes: Vec<NodeId>,
    pub origin: DragOrigin,
}

impl DragSource {
    pub fn new(nodes: Vec<NodeId>, origin: DragOrigin) -> Self {
        Self { nodes, origin }
    }

    pub fn single(node: NodeId, origin: DragOrigin) -> Self {
        Self {
            nodes: vec![node],
            origin,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
