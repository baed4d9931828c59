//! # Job contract
//!
//! A job is one reversible unit of edit. Its lifecycle is a small state
//! machine:
//!
//! ```text
//! Created ──execute()──▶ Executed ──undo()──▶ Undone
//!                           ▲                    │
//!                           └──────redo()────────┘
//!                    (either) ──dispose()──▶ Discarded
//! ```
//!
//! `execute` validates its preconditions before mutating anything: a
//! returned error means the document is exactly as it was. `undo` restores
//! the prior tree position from handles captured at execute time, never
//! from a recomputation. `dispose` is terminal: the manager calls it when
//! a job falls off both history stacks, and it frees any subtree that can
//! no longer be reached.

use easel_document::{Document, DocumentError, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Executed,
    Undone,
    Discarded,
}

/// Callback a mutating job invokes with the nodes it detached, so the
/// live selection can drop them before the edit returns
pub type SelectionRepair = Box<dyn FnMut(&[NodeId])>;

pub trait Job {
    /// Human-readable label for undo/redo menus
    fn description(&self) -> String;

    fn state(&self) -> JobState;

    /// Whether the preconditions hold against the current tree
    fn is_executable(&self, doc: &Document) -> bool;

    fn execute(&mut self, doc: &mut Document) -> Result<(), JobError>;

    fn undo(&mut self, doc: &mut Document) -> Result<(), JobError>;

    fn redo(&mut self, doc: &mut Document) -> Result<(), JobError>;

    /// Terminal hook: free anything that became unreachable once the job
    /// left both history stacks
    fn dispose(&mut self, _doc: &mut Document) {}
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Job precondition failed: {0}")]
    Precondition(String),

    #[error("An edit is already running; nested edits are not permitted")]
    ReentrantEdit,

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Composite job '{description}' failed at step {step}: {source}")]
    Composite {
        description: String,
        step: usize,
        #[source]
        source: Box<JobError>,
    },
}

impl JobError {
    pub fn precondition(message: impl Into<String>) -> Self {
        JobError::Precondition(message.into())
    }
}

/// Guard for the per-kind state machine
pub(crate) fn require_state(
    actual: JobState,
    expected: JobState,
    description: &str,
) -> Result<(), JobError> {
    if actual == expected {
        Ok(())
    } else {
        Err(JobError::Precondition(format!(
            "{}: state is {:?}, expected {:?}",
            description, actual, expected
        )))
    }
}
