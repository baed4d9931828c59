//! Error types for the document tree
//!
//! Every variant here is detected *before* mutation: a failed operation
//! leaves the tree untouched. Problems with existing tree content
//! (dangling references) are collected as diagnostics instead; see
//! `diagnostics`.

use crate::node::NodeId;
use easel_registry::RegistryError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not an instance")]
    NotAnInstance(NodeId),

    #[error("Node {0} is not a property")]
    NotAProperty(NodeId),

    #[error("Property '{property}' on class '{class}' is not a slot")]
    NotASlot { class: String, property: String },

    #[error("Property '{property}' on class '{class}' holds children; edit it through insert/detach")]
    NotAValue { class: String, property: String },

    #[error("Slot '{property}' on class '{class}' accepts a single child and is occupied")]
    Cardinality { class: String, property: String },

    #[error("Inserting {child} under {parent} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },

    #[error("Node {0} is already attached")]
    AlreadyAttached(NodeId),

    #[error("Node {0} is not attached to any parent")]
    NotAttached(NodeId),

    #[error("Document already has a root")]
    RootOccupied,
}
