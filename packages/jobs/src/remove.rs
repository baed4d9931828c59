//! Remove a subtree from the document.
//!
//! References elsewhere in the tree that point into the removed subtree
//! are detached first, so no dangling cross-link survives the edit; undo
//! restores them at their exact positions. Redo re-applies through the
//! execute path (the tree is identical when redo runs, so the same
//! references are found again).

use crate::job::{require_state, Job, JobError, JobState, SelectionRepair};
use easel_document::{DetachedHandle, Document, DocumentNode, NodeId};
use std::collections::HashSet;

pub struct RemoveJob {
    node: NodeId,
    handle: Option<DetachedHandle>,
    pruned_refs: Vec<DetachedHandle>,
    repair: Option<SelectionRepair>,
    state: JobState,
}

impl RemoveJob {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            handle: None,
            pruned_refs: Vec::new(),
            repair: None,
            state: JobState::Created,
        }
    }

    /// Attach a callback invoked with every node this job detaches, so
    /// the live selection can drop them as part of the edit
    pub fn with_selection_repair(mut self, repair: SelectionRepair) -> Self {
        self.repair = Some(repair);
        self
    }

    fn apply(&mut self, doc: &mut Document) -> Result<(), JobError> {
        if !doc.is_attached(self.node) {
            return Err(JobError::precondition(format!(
                "node {} is not attached",
                self.node
            )));
        }

        // Assigned ids inside the subtree being removed
        let subtree: HashSet<NodeId> = doc.collect_subtree(self.node).into_iter().collect();
        let removed_ids: HashSet<String> = subtree
            .iter()
            .filter_map(|id| doc.node(*id))
            .filter_map(|node| match node {
                DocumentNode::Instance(inst) => inst.assigned_id.clone(),
                _ => None,
            })
            .collect();

        // Prune references elsewhere that point into the subtree
        let dangling: Vec<NodeId> = doc
            .attached_references()
            .into_iter()
            .filter(|id| !subtree.contains(id))
            .filter(|id| match doc.node(*id) {
                Some(DocumentNode::Reference(reference)) => {
                    removed_ids.contains(&reference.target)
                }
                _ => false,
            })
            .collect();

        for reference in &dangling {
            self.pruned_refs.push(doc.detach(*reference)?);
        }

        match doc.detach(self.node) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => {
                // Put the pruned references back before reporting
                for handle in self.pruned_refs.drain(..).rev() {
                    doc.reattach(handle)?;
                }
                return Err(e.into());
            }
        }

        if let Some(repair) = &mut self.repair {
            let mut detached = vec![self.node];
            detached.extend(dangling);
            repair(&detached);
        }
        Ok(())
    }
}

impl Job for RemoveJob {
    fn description(&self) -> String {
        "Remove object".to_string()
    }

    fn state(&self) -> JobState {
        self.state
    }

    fn is_executable(&self, doc: &Document) -> bool {
        doc.is_attached(self.node)
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Created, "remove job")?;
        self.apply(doc)?;
        self.state = JobState::Executed;
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Executed, "remove job")?;
        let handle = self
            .handle
            .take()
            .ok_or_else(|| JobError::precondition("remove job has no captured slot"))?;
        doc.reattach(handle)?;
        // References go back in reverse detach order so every captured
        // index lands where it was taken from
        for handle in self.pruned_refs.drain(..).rev() {
            doc.reattach(handle)?;
        }
        self.state = JobState::Undone;
        Ok(())
    }

    fn redo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Undone, "remove job")?;
        self.apply(doc)?;
        self.state = JobState::Executed;
        Ok(())
    }

    fn dispose(&mut self, doc: &mut Document) {
        if self.state == JobState::Executed {
            // The removed subtree can never be reinserted now
            let _ = doc.discard_subtree(self.node);
            for handle in self.pruned_refs.drain(..) {
                let _ = doc.discard_subtree(handle.node);
            }
        }
        self.state = JobState::Discarded;
    }
}
