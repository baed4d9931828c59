//! # Document nodes
//!
//! A single tagged sum type covers every node kind, so tree-walking code
//! is exhaustive at the match site. Nodes live in a flat arena keyed by
//! `NodeId`; every link in the tree is an id. Ownership flows root→leaves
//! through the child-id lists; the `parent`/`owner` back-links are plain
//! non-owning ids.

use easel_registry::{Cardinality, PropertyValue};
use serde::{Deserialize, Serialize};

/// Arena key for one document node
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One node of the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DocumentNode {
    /// A constructed object: class name, properties, optional assigned id
    Instance(InstanceNode),

    /// A named property of an instance, holding the property's value or
    /// child nodes
    Property(PropertyNode),

    /// Non-owning pointer to another instance by assigned id
    Reference(ReferenceNode),

    /// Terminal value
    Literal(LiteralNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    pub class_name: String,

    /// The markup-visible id other nodes reference; optional
    pub assigned_id: Option<String>,

    /// Property node ids, kept in registry declaration order
    pub properties: Vec<NodeId>,

    /// Owning property node, None while detached or at the root
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyNode {
    pub name: String,
    pub cardinality: Cardinality,

    /// Value/child node ids in order
    pub children: Vec<NodeId>,

    /// The instance this property belongs to
    pub owner: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceNode {
    /// Assigned id of the referenced instance
    pub target: String,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralNode {
    pub value: PropertyValue,
    pub parent: Option<NodeId>,
}

impl DocumentNode {
    /// The node's owning parent: the property holding it, or the owner
    /// instance for property nodes. None for detached roots.
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            DocumentNode::Instance(n) => n.parent,
            DocumentNode::Property(n) => Some(n.owner),
            DocumentNode::Reference(n) => n.parent,
            DocumentNode::Literal(n) => n.parent,
        }
    }

    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            DocumentNode::Instance(n) => n.parent = parent,
            // A property's owner never changes after materialization
            DocumentNode::Property(_) => {}
            DocumentNode::Reference(n) => n.parent = parent,
            DocumentNode::Literal(n) => n.parent = parent,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceNode> {
        match self {
            DocumentNode::Instance(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyNode> {
        match self {
            DocumentNode::Property(n) => Some(n),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            DocumentNode::Instance(_) => "instance",
            DocumentNode::Property(_) => "property",
            DocumentNode::Reference(_) => "reference",
            DocumentNode::Literal(_) => "literal",
        }
    }
}

/// Where a detached node came from; consumed by reattachment so undo puts
/// a subtree back in exactly the slot it left, without recomputing an
/// insertion point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetachedHandle {
    pub node: NodeId,
    pub slot: DetachedSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DetachedSlot {
    /// The node was the document root
    Root,

    /// The node sat under `parent`'s `slot` at `index`
    Property {
        parent: NodeId,
        slot: String,
        index: usize,
    },
}
