//! # Easel Document
//!
//! The live document model at the heart of the editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ loader (external): markup → document tree   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: arena of DocumentNode variants    │
//! │  - instances mirrored by live objects       │
//! │  - revision counter + queued change events  │
//! │  - detach/reattach handles for undo & drag  │
//! │  - hierarchy mask, visitor walk, snapshots  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ serializer / renderer (external consumers)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is source of truth**: live objects are a derived mirror,
//!    reproducible by replaying property nodes in declaration order
//! 2. **Validate, then mutate**: an error return means nothing changed
//! 3. **Ids, not pointers**: nodes live in a flat arena; parent links are
//!    plain non-owning ids, ownership flows root→leaves only
//! 4. **Observers wait**: change events queue during an edit and are
//!    delivered only after it completes

mod diagnostics;
mod document;
mod errors;
mod events;
mod ids;
mod mask;
mod node;
mod snapshot;
mod visitor;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use document::Document;
pub use errors::DocumentError;
pub use events::{DocumentChange, DocumentEvent};
pub use ids::{document_id, IdGenerator};
pub use mask::HierarchyMask;
pub use node::{
    DetachedHandle, DetachedSlot, DocumentNode, InstanceNode, LiteralNode, NodeId, PropertyNode,
    ReferenceNode,
};
pub use snapshot::{DocumentSnapshot, NodeSnapshot, PropertySnapshot};
pub use visitor::{walk_document, walk_instance, walk_node, walk_property, Visitor};

// Re-export the registry surface documents are built against
pub use easel_registry::{
    Accepts, Cardinality, ClassMeta, ConstructorArgs, LiveObject, PropertyKind, PropertyMeta,
    PropertyValue, Registry, RegistryError, ValueKind,
};
