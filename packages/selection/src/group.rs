//! # Selection group
//!
//! Immutable description of what is selected: the member set, the node
//! the user hit most recently, and the lowest common ancestor. A group is
//! recomputed on every selection-changing operation, never mutated in
//! place, so observers can hold one safely across edits.

use easel_document::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionGroup {
    nodes: BTreeSet<NodeId>,
    hit: Option<NodeId>,

    /// Nearest instance that is an ancestor of every member; None means
    /// the whole document
    common_ancestor: Option<NodeId>,
}

impl SelectionGroup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        nodes: BTreeSet<NodeId>,
        hit: Option<NodeId>,
        common_ancestor: Option<NodeId>,
    ) -> Self {
        Self {
            nodes,
            hit,
            common_ancestor,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn hit_node(&self) -> Option<NodeId> {
        self.hit
    }

    pub fn common_ancestor(&self) -> Option<NodeId> {
        self.common_ancestor
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
