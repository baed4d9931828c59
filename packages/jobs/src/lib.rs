//! # Easel Jobs
//!
//! Transactional, reversible edits over the document tree.
//!
//! ## Architecture
//!
//! ```text
//! gesture / inspector / drop resolver
//!                 ↓ builds
//! ┌─────────────────────────────────────────────┐
//! │ Job: one reversible unit of edit            │
//! │  Insert · Remove · Move · SetProperty ·     │
//! │  SetAssignedId · Wrap · Composite           │
//! └─────────────────────────────────────────────┘
//!                 ↓ pushed through
//! ┌─────────────────────────────────────────────┐
//! │ JobManager: bounded undo/redo stacks,       │
//! │ re-entrancy guard, oldest-first eviction    │
//! └─────────────────────────────────────────────┘
//!                 ↓ mutates
//! ┌─────────────────────────────────────────────┐
//! │ document tree + live-object mirror          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Validate, then mutate**: a failed execute leaves the tree as it
//!    was; every job checks its preconditions before writing
//! 2. **Undo from captured handles**: prior positions are recorded at
//!    execute time, never recomputed
//! 3. **All-or-nothing composites**: a failed step unwinds everything
//!    already applied before one aggregate failure is reported
//! 4. **One edit at a time**: the document's edit lock rejects nested
//!    pushes outright

mod composite;
mod insert;
mod job;
mod manager;
mod modify;
mod relocate;
mod remove;
mod wrap;

#[cfg(test)]
pub(crate) mod testutil;

pub use composite::CompositeJob;
pub use insert::InsertJob;
pub use job::{Job, JobError, JobState, SelectionRepair};
pub use manager::JobManager;
pub use modify::{SetAssignedIdJob, SetPropertyJob};
pub use relocate::MoveJob;
pub use remove::RemoveJob;
pub use wrap::WrapJob;
