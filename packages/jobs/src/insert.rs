//! Insert a detached subtree into a slot.
//!
//! Redo re-applies through the execute path: the insertion coordinates
//! (parent, slot, index) are explicit job fields, so re-execution is
//! deterministic.

use crate::job::{require_state, Job, JobError, JobState};
use easel_document::{Document, NodeId};

pub struct InsertJob {
    parent: NodeId,
    slot: String,
    child: NodeId,
    index: usize,
    state: JobState,
}

impl InsertJob {
    pub fn new(parent: NodeId, slot: impl Into<String>, child: NodeId, index: usize) -> Self {
        Self {
            parent,
            slot: slot.into(),
            child,
            index,
            state: JobState::Created,
        }
    }
}

impl Job for InsertJob {
    fn description(&self) -> String {
        format!("Insert into '{}'", self.slot)
    }

    fn state(&self) -> JobState {
        self.state
    }

    fn is_executable(&self, doc: &Document) -> bool {
        doc.can_insert_child(self.parent, &self.slot, self.child, self.index)
            .is_ok()
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Created, "insert job")?;
        doc.insert_child(self.parent, &self.slot, self.child, self.index)?;
        self.state = JobState::Executed;
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Executed, "insert job")?;
        doc.detach(self.child)?;
        self.state = JobState::Undone;
        Ok(())
    }

    fn redo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Undone, "insert job")?;
        doc.insert_child(self.parent, &self.slot, self.child, self.index)?;
        self.state = JobState::Executed;
        Ok(())
    }

    fn dispose(&mut self, doc: &mut Document) {
        if self.state == JobState::Undone {
            // The child sits detached and nothing can reinsert it now
            let _ = doc.discard_subtree(self.child);
        }
        self.state = JobState::Discarded;
    }
}
