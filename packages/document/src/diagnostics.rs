//! # Diagnostics
//!
//! Non-fatal findings about existing tree content. These never block
//! editing; they are attached to the offending node and surfaced to the
//! UI as a report.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub node: NodeId,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DiagnosticKind {
    /// A reference whose target id resolves to no attached instance
    UnresolvedReference { target: String },
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::UnresolvedReference { target } => {
                write!(f, "reference target '{}' does not resolve", target)
            }
        }
    }
}
