//! # Structural snapshots
//!
//! A snapshot is a plain serializable value capturing everything the
//! markup serializer would write: class names, assigned ids, property
//! names in declaration order, literal values, reference targets. Two
//! documents with equal snapshots are structurally identical, regardless
//! of the arena ids behind them. Snapshots back the structural-equality
//! assertions in tests and can be persisted as undo checkpoints.

use crate::document::Document;
use crate::node::{DocumentNode, NodeId};
use easel_registry::PropertyValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub root: Option<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeSnapshot {
    Instance {
        class_name: String,
        assigned_id: Option<String>,
        properties: Vec<PropertySnapshot>,
    },
    Reference {
        target: String,
    },
    Literal {
        value: PropertyValue,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    pub name: String,
    pub children: Vec<NodeSnapshot>,
}

impl Document {
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            root: self.root().and_then(|root| self.subtree_snapshot(root)),
        }
    }

    pub fn subtree_snapshot(&self, node: NodeId) -> Option<NodeSnapshot> {
        match self.node(node)? {
            DocumentNode::Instance(inst) => Some(NodeSnapshot::Instance {
                class_name: inst.class_name.clone(),
                assigned_id: inst.assigned_id.clone(),
                properties: inst
                    .properties
                    .iter()
                    .filter_map(|prop_id| {
                        let prop = self.node(*prop_id)?.as_property()?;
                        Some(PropertySnapshot {
                            name: prop.name.clone(),
                            children: prop
                                .children
                                .iter()
                                .filter_map(|child| self.subtree_snapshot(*child))
                                .collect(),
                        })
                    })
                    .collect(),
            }),
            DocumentNode::Reference(reference) => Some(NodeSnapshot::Reference {
                target: reference.target.clone(),
            }),
            DocumentNode::Literal(literal) => Some(NodeSnapshot::Literal {
                value: literal.value.clone(),
            }),
            DocumentNode::Property(_) => None,
        }
    }
}
