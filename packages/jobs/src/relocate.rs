//! Move a node to a new parent slot.
//!
//! The origin slot is captured at execute time and reused verbatim by
//! undo, so a round trip restores the exact prior position even if the
//! surrounding list changed meanwhile would have produced a different
//! recomputed index. Redo re-applies through the execute path and
//! recaptures the origin.

use crate::job::{require_state, Job, JobError, JobState};
use easel_document::{DetachedHandle, Document, NodeId};

pub struct MoveJob {
    node: NodeId,
    new_parent: NodeId,
    slot: String,
    index: usize,
    origin: Option<DetachedHandle>,
    state: JobState,
}

impl MoveJob {
    pub fn new(node: NodeId, new_parent: NodeId, slot: impl Into<String>, index: usize) -> Self {
        Self {
            node,
            new_parent,
            slot: slot.into(),
            index,
            origin: None,
            state: JobState::Created,
        }
    }

    fn apply(&mut self, doc: &mut Document) -> Result<(), JobError> {
        let handle = doc.detach(self.node)?;
        if let Err(e) = doc.insert_child(self.new_parent, &self.slot, self.node, self.index) {
            // Failed after the detach: restore and report, tree unchanged
            doc.reattach(handle)?;
            return Err(e.into());
        }
        self.origin = Some(handle);
        Ok(())
    }
}

impl Job for MoveJob {
    fn description(&self) -> String {
        format!("Move into '{}'", self.slot)
    }

    fn state(&self) -> JobState {
        self.state
    }

    fn is_executable(&self, doc: &Document) -> bool {
        if !doc.is_attached(self.node) {
            return false;
        }
        // The node is attached right now, so probe everything except the
        // child's attachment state
        match doc.can_insert_child(self.new_parent, &self.slot, self.node, self.index) {
            Ok(()) => true,
            Err(easel_document::DocumentError::AlreadyAttached(_)) => true,
            Err(_) => false,
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Created, "move job")?;
        self.apply(doc)?;
        self.state = JobState::Executed;
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Executed, "move job")?;
        let origin = self
            .origin
            .take()
            .ok_or_else(|| JobError::precondition("move job has no captured origin"))?;
        doc.detach(self.node)?;
        doc.reattach(origin)?;
        self.state = JobState::Undone;
        Ok(())
    }

    fn redo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Undone, "move job")?;
        self.apply(doc)?;
        self.state = JobState::Executed;
        Ok(())
    }
}
