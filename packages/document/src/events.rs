//! # Change notifications
//!
//! Every structural or property mutation queues one event. The queue is
//! drained with `Document::take_events` only after the running edit
//! completes, so observers never see a half-applied tree.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEvent {
    /// Revision the document reached with this change
    pub revision: u64,
    pub change: DocumentChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DocumentChange {
    /// Children of `parent` changed (insert, detach, live rebuild)
    Structure { parent: NodeId },

    /// A scalar property or assigned id changed
    Property { instance: NodeId, property: String },

    /// The document root was set or cleared
    Root,
}
