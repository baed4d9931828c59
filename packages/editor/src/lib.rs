//! # Easel Editor
//!
//! Session glue for the editing core.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ loader (external): markup → document tree   │
//! └─────────────────────────────────────────────┘
//!                     ↓ hands the tree to
//! ┌─────────────────────────────────────────────┐
//! │ EditSession                                 │
//! │  - owns the document and its job history    │
//! │  - selection with post-edit repair          │
//! │  - batched change delivery to observers     │
//! └─────────────────────────────────────────────┘
//!                     ↓ consumed by
//! ┌─────────────────────────────────────────────┐
//! │ canvas / inspector / serializer (external)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use easel_editor::EditSession;
//! use easel_jobs::SetPropertyJob;
//!
//! let mut session = EditSession::new(document);
//! session.select(&[label]);
//! session.push(Box::new(SetPropertyJob::new(
//!     label,
//!     "text",
//!     PropertyValue::string("Save"),
//! )))?;
//! session.undo()?;
//! ```

mod session;

pub use session::{DocumentObserver, EditSession};

// Re-export the surfaces a session exposes
pub use easel_document::{Document, DocumentChange, DocumentEvent, NodeId};
pub use easel_jobs::{Job, JobError, JobManager};
pub use easel_selection::{SelectionGroup, SelectionModel};
