//! # Easel Drag & Drop
//!
//! Drop-target resolution for the visual canvas.
//!
//! ## Architecture
//!
//! ```text
//! gesture layer: pointer coords + DragSource
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ resolver: hit instance → candidate parents  │
//! │  - accept_drag_source (cardinality, cycle,  │
//! │    class constraints), failing closed       │
//! │  - gap math over sibling bounds (probe)     │
//! │  - job_for: uncommitted Move/Insert job     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ GhostPreview: execute/undo per pointer move │
//! │ JobManager: final drop only                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The resolver never mutates; geometry comes from the renderer adapter
//! through the [`LayoutProbe`] capability.

mod geometry;
mod payload;
mod preview;
mod resolver;

pub use geometry::{insert_position, Bounds, InsertPosition, LayoutAxis};
pub use payload::{DragOrigin, DragSource};
pub use preview::GhostPreview;
pub use resolver::{DropTarget, DropTargetResolver, LayoutProbe};
