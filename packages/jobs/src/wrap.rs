//! Wrap a node in a freshly constructed container.
//!
//! The wrapper takes over the wrapped node's slot (including the document
//! root) and receives the node in its main slot. The wrapper instance is
//! created once and kept across undo/redo so its identity is stable; redo
//! re-runs the structural steps of the execute path.

use crate::job::{require_state, Job, JobError, JobState};
use easel_document::{DetachedHandle, Document, NodeId};

pub struct WrapJob {
    node: NodeId,
    wrapper_class: String,
    wrapper: Option<NodeId>,
    wrapper_slot: Option<String>,
    origin: Option<DetachedHandle>,
    state: JobState,
}

impl WrapJob {
    pub fn new(node: NodeId, wrapper_class: impl Into<String>) -> Self {
        Self {
            node,
            wrapper_class: wrapper_class.into(),
            wrapper: None,
            wrapper_slot: None,
            origin: None,
            state: JobState::Created,
        }
    }

    /// The wrapper instance, once execute has created it
    pub fn wrapper(&self) -> Option<NodeId> {
        self.wrapper
    }

    fn main_slot_of_wrapper_class(&self, doc: &Document) -> Option<String> {
        doc.registry()
            .class(&self.wrapper_class)
            .and_then(|meta| meta.main_slot())
            .map(|p| p.name.clone())
    }

    fn apply(&mut self, doc: &mut Document) -> Result<(), JobError> {
        let slot = match &self.wrapper_slot {
            Some(slot) => slot.clone(),
            None => self.main_slot_of_wrapper_class(doc).ok_or_else(|| {
                JobError::precondition(format!(
                    "class '{}' has no slot for children",
                    self.wrapper_class
                ))
            })?,
        };

        // Create the wrapper before moving anything; a construction
        // failure leaves the tree untouched
        let (wrapper, created_here) = match self.wrapper {
            Some(wrapper) => (wrapper, false),
            None => (doc.create_instance(&self.wrapper_class, vec![])?, true),
        };
        let discard_created = |doc: &mut Document| {
            if created_here {
                let _ = doc.discard_subtree(wrapper);
            }
        };

        let origin = match doc.detach(self.node) {
            Ok(origin) => origin,
            Err(e) => {
                discard_created(doc);
                return Err(e.into());
            }
        };
        let wrapper_handle = DetachedHandle {
            node: wrapper,
            slot: origin.slot.clone(),
        };
        if let Err(e) = doc.reattach(wrapper_handle) {
            doc.reattach(origin)?;
            discard_created(doc);
            return Err(e.into());
        }
        if let Err(e) = doc.insert_child(wrapper, &slot, self.node, 0) {
            doc.detach(wrapper)?;
            doc.reattach(origin)?;
            discard_created(doc);
            return Err(e.into());
        }

        self.wrapper = Some(wrapper);
        self.wrapper_slot = Some(slot);
        self.origin = Some(origin);
        Ok(())
    }
}

impl Job for WrapJob {
    fn description(&self) -> String {
        format!("Wrap in {}", self.wrapper_class)
    }

    fn state(&self) -> JobState {
        self.state
    }

    fn is_executable(&self, doc: &Document) -> bool {
        doc.is_attached(self.node) && self.main_slot_of_wrapper_class(doc).is_some()
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Created, "wrap job")?;
        self.apply(doc)?;
        self.state = JobState::Executed;
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Executed, "wrap job")?;
        let wrapper = self
            .wrapper
            .ok_or_else(|| JobError::precondition("wrap job has no wrapper"))?;
        let origin = self
            .origin
            .take()
            .ok_or_else(|| JobError::precondition("wrap job has no captured origin"))?;

        doc.detach(self.node)?;
        doc.detach(wrapper)?;
        doc.reattach(origin)?;
        self.state = JobState::Undone;
        Ok(())
    }

    fn redo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Undone, "wrap job")?;
        self.apply(doc)?;
        self.state = JobState::Executed;
        Ok(())
    }

    fn dispose(&mut self, doc: &mut Document) {
        if self.state == JobState::Undone {
            if let Some(wrapper) = self.wrapper {
                // The empty wrapper sits detached with no way back in
                let _ = doc.discard_subtree(wrapper);
            }
        }
        self.state = JobState::Discarded;
    }
}
