//! # Job manager
//!
//! Owns the undo and redo stacks. `push` executes a job and records it;
//! only a successful execute clears the redo stack and enters history.
//! History is bounded: above the configured depth the oldest undo entry
//! is evicted (oldest-first, never an entry a pending redo still needs;
//! the redo stack is separate and cleared on push). Every execute, undo
//! and redo runs inside the document's edit lock; an attempt to start an
//! edit while one is running fails fast instead of interleaving.

use crate::job::{Job, JobError};
use easel_document::Document;
use tracing::debug;

pub struct JobManager {
    undo_stack: Vec<Box<dyn Job>>,
    redo_stack: Vec<Box<dyn Job>>,
    depth: usize,
}

impl JobManager {
    pub const DEFAULT_DEPTH: usize = 100;

    pub fn new() -> Self {
        Self::with_depth(Self::DEFAULT_DEPTH)
    }

    pub fn with_depth(depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            depth,
        }
    }

    /// Execute a job and push it onto the undo stack
    pub fn push(&mut self, doc: &mut Document, mut job: Box<dyn Job>) -> Result<(), JobError> {
        if !doc.try_begin_edit() {
            return Err(JobError::ReentrantEdit);
        }
        let result = job.execute(doc);
        doc.end_edit();
        result?;
        debug!(description = %job.description(), "executed job");

        for mut stale in self.redo_stack.drain(..) {
            stale.dispose(doc);
        }
        self.undo_stack.push(job);
        if self.undo_stack.len() > self.depth {
            let mut evicted = self.undo_stack.remove(0);
            evicted.dispose(doc);
        }
        Ok(())
    }

    /// Undo the most recent job; false when there is nothing to undo
    pub fn undo(&mut self, doc: &mut Document) -> Result<bool, JobError> {
        let Some(mut job) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if !doc.try_begin_edit() {
            self.undo_stack.push(job);
            return Err(JobError::ReentrantEdit);
        }
        let result = job.undo(doc);
        doc.end_edit();
        match result {
            Ok(()) => {
                debug!(description = %job.description(), "undid job");
                self.redo_stack.push(job);
                Ok(true)
            }
            Err(e) => {
                self.undo_stack.push(job);
                Err(e)
            }
        }
    }

    /// Redo the most recently undone job; false when there is nothing to
    /// redo
    pub fn redo(&mut self, doc: &mut Document) -> Result<bool, JobError> {
        let Some(mut job) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if !doc.try_begin_edit() {
            self.redo_stack.push(job);
            return Err(JobError::ReentrantEdit);
        }
        let result = job.redo(doc);
        doc.end_edit();
        match result {
            Ok(()) => {
                debug!(description = %job.description(), "redid job");
                self.undo_stack.push(job);
                Ok(true)
            }
            Err(e) => {
                self.redo_stack.push(job);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|job| job.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|job| job.description())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, disposing every held job
    pub fn clear(&mut self, doc: &mut Document) {
        for mut job in self.undo_stack.drain(..) {
            job.dispose(doc);
        }
        for mut job in self.redo_stack.drain(..) {
            job.dispose(doc);
        }
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}
