//! # Ghost preview
//!
//! Live preview of a pending drop: the candidate job is executed for
//! real, so the renderer shows the document exactly as it would look, and
//! undone again as soon as the pointer moves to a different gap. Preview
//! jobs never enter the job manager; only the final drop is pushed to
//! history, as a freshly built job.
//!
//! Per pointer move the driver hides the current ghost first, resolves
//! the new target against the settled tree, then shows the new job;
//! resolving against a document that still contains the ghost would count
//! the previewed payload among the siblings.

use easel_document::Document;
use easel_jobs::{Job, JobError};
use tracing::debug;

#[derive(Default)]
pub struct GhostPreview {
    current: Option<Box<dyn Job>>,
}

impl GhostPreview {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Replace the current preview with a new candidate job: the old one
    /// is undone, the new one executed
    pub fn show(&mut self, doc: &mut Document, mut job: Box<dyn Job>) -> Result<(), JobError> {
        self.hide(doc)?;
        job.execute(doc)?;
        debug!(description = %job.description(), "showing drop preview");
        self.current = Some(job);
        Ok(())
    }

    /// Undo and drop the current preview, if any
    pub fn hide(&mut self, doc: &mut Document) -> Result<(), JobError> {
        if let Some(mut job) = self.current.take() {
            job.undo(doc)?;
            debug!("cleared drop preview");
        }
        Ok(())
    }

    pub fn is_showing(&self) -> bool {
        self.current.is_some()
    }
}
