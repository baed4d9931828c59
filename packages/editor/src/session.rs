//! # Edit session
//!
//! One open document and everything editing it: the job manager, the
//! selection, and the observer list. The session is the unit of document
//! ownership: a document belongs to exactly one session, and every edit
//! flows through [`EditSession::push`].
//!
//! After each successful push/undo/redo the session repairs the selection
//! (no detached node may stay selected) and only then delivers the queued
//! document events, so observers always see a settled tree.

use easel_document::{Document, DocumentEvent, NodeId};
use easel_jobs::{CompositeJob, Job, JobError, JobManager, RemoveJob};
use easel_selection::{SelectionGroup, SelectionModel};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

pub type DocumentObserver = Box<dyn FnMut(&DocumentEvent)>;

pub struct EditSession {
    document: Document,
    jobs: JobManager,

    /// Shared so selection-repair callbacks inside jobs can reach it
    selection: Rc<RefCell<SelectionModel>>,

    observers: Vec<DocumentObserver>,
}

impl EditSession {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            jobs: JobManager::new(),
            selection: Rc::new(RefCell::new(SelectionModel::new())),
            observers: Vec::new(),
        }
    }

    pub fn with_history_depth(document: Document, depth: usize) -> Self {
        Self {
            jobs: JobManager::with_depth(depth),
            ..Self::new(document)
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct tree access for the markup loader, before editing starts
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    // ---- command engine -------------------------------------------------

    /// Execute a job and record it in history
    pub fn push(&mut self, job: Box<dyn Job>) -> Result<(), JobError> {
        self.jobs.push(&mut self.document, job)?;
        self.after_edit();
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool, JobError> {
        let undone = self.jobs.undo(&mut self.document)?;
        if undone {
            self.after_edit();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, JobError> {
        let redone = self.jobs.redo(&mut self.document)?;
        if redone {
            self.after_edit();
        }
        Ok(redone)
    }

    pub fn can_undo(&self) -> bool {
        self.jobs.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.jobs.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.jobs.undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.jobs.redo_description()
    }

    /// Remove every selected subtree as one undoable step. Only topmost
    /// selected nodes are removed (a selected descendant goes with its
    /// selected ancestor). Returns false when nothing was selected.
    pub fn remove_selected(&mut self) -> Result<bool, JobError> {
        let group = self.selection.borrow().group().clone();
        let roots: Vec<NodeId> = group
            .nodes()
            .filter(|n| {
                !group
                    .nodes()
                    .any(|a| a != *n && self.document.is_ancestor(a, *n))
            })
            .collect();
        if roots.is_empty() {
            return Ok(false);
        }
        debug!(count = roots.len(), "removing selection");

        let repair_for = |selection: &Rc<RefCell<SelectionModel>>| {
            let selection = Rc::clone(selection);
            Box::new(move |detached: &[NodeId]| {
                selection.borrow_mut().remove_members(detached);
            })
        };

        if roots.len() == 1 {
            let job = RemoveJob::new(roots[0]).with_selection_repair(repair_for(&self.selection));
            self.push(Box::new(job))?;
            return Ok(true);
        }

        let mut composite = CompositeJob::new(format!("Remove {} objects", roots.len()));
        for node in roots {
            composite.push(Box::new(
                RemoveJob::new(node).with_selection_repair(repair_for(&self.selection)),
            ));
        }
        self.push(Box::new(composite))?;
        Ok(true)
    }

    // ---- selection ------------------------------------------------------

    pub fn selection(&self) -> SelectionGroup {
        self.selection.borrow().group().clone()
    }

    pub fn select(&mut self, nodes: &[NodeId]) -> SelectionGroup {
        self.selection
            .borrow_mut()
            .select(&self.document, nodes, None)
            .clone()
    }

    pub fn toggle_selection(&mut self, nodes: &[NodeId]) -> SelectionGroup {
        self.selection
            .borrow_mut()
            .toggle(&self.document, nodes)
            .clone()
    }

    pub fn clear_selection(&mut self) {
        self.selection.borrow_mut().clear();
    }

    pub fn select_next(&mut self) -> bool {
        self.selection.borrow_mut().select_next(&self.document)
    }

    pub fn select_previous(&mut self) -> bool {
        self.selection.borrow_mut().select_previous(&self.document)
    }

    pub fn select_all(&mut self) -> SelectionGroup {
        self.selection
            .borrow_mut()
            .select_all(&self.document)
            .clone()
    }

    // ---- observers ------------------------------------------------------

    /// Register a change observer; events arrive batched after each
    /// completed edit
    pub fn observe(&mut self, observer: impl FnMut(&DocumentEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn after_edit(&mut self) {
        // The selection never points at detached nodes once an edit has
        // returned, whether or not the jobs carried repair callbacks
        self.selection.borrow_mut().retain_attached(&self.document);

        for event in self.document.take_events() {
            for observer in &mut self.observers {
                observer(&event);
            }
        }
    }
}
